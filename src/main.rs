// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use contact_server::{
    api::router,
    auth::{JwtVerifier, USERNAME_FIELD, USER_COLLECTION},
    config::{Config, LogFormat, StoreBackend, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{DocumentStore, MemoryDocumentStore, RedbDocumentStore},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
    token.cancel();
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(2);
        }
    };

    init_tracing(config.log_format);

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Redb => {
            let path = config.database_path();
            match RedbDocumentStore::open(&path) {
                Ok(store) => {
                    tracing::info!(path = %path.display(), "opened user database");
                    Arc::new(store.with_unique_index(USER_COLLECTION, USERNAME_FIELD))
                }
                Err(e) => {
                    tracing::error!(error = %e, path = %path.display(), "failed to open user database");
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; accounts will not survive a restart");
            Arc::new(MemoryDocumentStore::new().with_unique_index(USER_COLLECTION, USERNAME_FIELD))
        }
    };

    let verifier = Arc::new(JwtVerifier::hs256(config.jwt_secret.as_bytes()));
    let state = AppState::new(store, verifier).with_lookup_timeout(config.lookup_timeout);
    let app = router(state);

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid bind address");
            std::process::exit(2);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "contact server listening (GraphiQL at /, GraphQL at /query)");

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
