// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors returned to GraphQL clients.
//!
//! Domain errors are mapped to a status and a short message; internal detail
//! stays in the logs.

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;

use crate::auth::password::{HashingError, MAX_PASSWORD_BYTES};
use crate::auth::UserError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Machine-readable code, e.g. `SERVICE_UNAVAILABLE`.
    pub fn code(&self) -> String {
        self.status
            .canonical_reason()
            .unwrap_or("UNKNOWN")
            .to_uppercase()
            .replace(' ', "_")
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound => Self::new(StatusCode::NOT_FOUND, "user not found"),
            UserError::Persistence(e) if e.is_duplicate() => {
                Self::conflict("username is already taken")
            }
            UserError::Persistence(e) => {
                tracing::error!(error = %e, "user store failure");
                Self::service_unavailable("user store is unavailable")
            }
            UserError::Hashing(HashingError::TooLong) => Self::bad_request(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes"
            )),
            UserError::Hashing(e) => {
                tracing::error!(error = %e, "password hashing failure");
                Self::internal("could not process password")
            }
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let status = self.status.as_u16();
        async_graphql::Error::new(self.message.clone()).extend_with(|_, e| {
            e.set("code", code);
            e.set("status", status);
        })
    }
}
