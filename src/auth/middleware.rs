// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Runs before the GraphQL handler and turns the raw `Authorization` header
//! into a [`RequestContext`]:
//!
//! | Situation                               | Outcome                     |
//! |-----------------------------------------|-----------------------------|
//! | no header (or empty header)             | anonymous                   |
//! | token fails verification                | `403 Invalid token`         |
//! | valid token, no such user               | anonymous                   |
//! | valid token, store error or timeout     | anonymous (logged)          |
//! | valid token, user found                 | authenticated `{id, name}`  |
//!
//! The whole header value is the token; no `Bearer ` scheme is stripped.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/query", post(graphql_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_gate));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, CurrentUser, RequestContext, UserError};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_request_context(request.headers(), &state).await {
        Ok(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                code = e.error_code(),
                path = %request.uri().path(),
                "request rejected"
            );
            e.into_response()
        }
    }
}

/// Resolve the request context from request headers.
///
/// Only a token that fails verification is an error; every other outcome
/// lets the request through, with or without an identity.
pub async fn resolve_request_context(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<RequestContext, AuthError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(header) if !header.is_empty() => header,
        _ => return Ok(RequestContext::anonymous()),
    };

    let token = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let username = state.verifier.verify(token)?;

    let lookup = state.users.find_id_by_username(&username);
    match tokio::time::timeout(state.lookup_timeout, lookup).await {
        Ok(Ok(id)) => {
            tracing::debug!(user_id = %id, username = %username, "request authenticated");
            Ok(RequestContext::authenticated(CurrentUser { id, username }))
        }
        Ok(Err(UserError::NotFound)) => {
            tracing::debug!(username = %username, "token subject has no account; continuing anonymously");
            Ok(RequestContext::anonymous())
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, username = %username, "identity lookup failed; continuing anonymously");
            Ok(RequestContext::anonymous())
        }
        Err(_) => {
            tracing::warn!(
                username = %username,
                timeout_ms = state.lookup_timeout.as_millis() as u64,
                "identity lookup timed out; continuing anonymously"
            );
            Ok(RequestContext::anonymous())
        }
    }
}
