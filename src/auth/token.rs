// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token verification.
//!
//! Tokens are HS256 JWTs signed with the service secret. The verification key
//! is built once at startup and shared read-only between requests.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::claims::TokenClaims;
use super::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Validates a raw token string and returns the username it was issued for.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// HMAC-SHA256 JWT verifier.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier for tokens signed with `secret`.
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(reason = ?e.kind(), "token rejected");
            AuthError::InvalidToken
        })?;

        let username = token_data.claims.username;
        if username.is_empty() {
            tracing::debug!("token rejected: empty username claim");
            return Err(AuthError::InvalidToken);
        }
        Ok(username)
    }
}
