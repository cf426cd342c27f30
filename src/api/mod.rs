// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{auth::auth_gate, state::AppState};

pub mod graphql;
pub mod health;

pub fn router(state: AppState) -> Router {
    // Only the GraphQL endpoint sits behind the auth gate
    let gated = Router::new()
        .route(
            graphql::GRAPHQL_PATH,
            post(graphql::graphql_handler).get(graphql::graphql_get_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .route("/", get(graphql::graphiql))
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .merge(gated)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}
