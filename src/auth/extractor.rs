// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the request context.
//!
//! Handlers behind the auth gate take a [`RequestContext`] parameter:
//!
//! ```rust,ignore
//! async fn my_handler(ctx: RequestContext) -> impl IntoResponse {
//!     match auth::for_context(&ctx) { ... }
//! }
//! ```
//!
//! Extraction never rejects. A request that did not pass through the gate
//! yields an anonymous context.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::RequestContext;

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}
