// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated user representation.

use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// Only `username` is consumed downstream; `exp` is required so that
/// every accepted token has a bounded lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject of the token
    pub username: String,

    /// Expiration timestamp
    pub exp: u64,
}

/// Authenticated user attached to a request.
///
/// This is the only identity type handed to resolvers. It never carries the
/// password secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrentUser {
    /// Stable user ID
    pub id: String,

    /// Unique handle the token was issued for
    pub username: String,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_deserialize_from_token_payload() {
        let claims: TokenClaims =
            serde_json::from_str(r#"{"username":"alice","exp":1700003600}"#).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, 1_700_003_600);
    }

    #[test]
    fn claims_require_expiry() {
        let result = serde_json::from_str::<TokenClaims>(r#"{"username":"alice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn current_user_serializes_only_id_and_username() {
        let user = CurrentUser::new("u-1", "alice");
        let value = serde_json::to_value(&user).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["id"], "u-1");
        assert_eq!(object["username"], "alice");
    }
}
