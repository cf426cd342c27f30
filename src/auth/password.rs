// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! Passwords are hashed with bcrypt at a fixed cost. The resulting string is
//! self-describing (`$2b$<cost>$<salt><hash>`), so verification needs only the
//! stored secret and the candidate password.
//!
//! bcrypt reads at most 72 bytes of input, counting the NUL terminator it
//! appends. Longer passwords are refused outright instead of being silently
//! cut off.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// bcrypt work factor. Not configurable by callers.
#[cfg(not(test))]
const HASH_COST: u32 = 14;

/// Unit tests run at the bcrypt minimum to keep the suite fast.
#[cfg(test)]
const HASH_COST: u32 = 4;

/// Longest password bcrypt can hash without truncation.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Secret checked when a login names an unknown user, so that a miss costs
/// the same bcrypt round as a hit.
static UNKNOWN_USER_SECRET: LazyLock<Option<PasswordSecret>> =
    LazyLock::new(|| hash_password("no-such-user").ok());

/// Error raised by the hashing primitive.
#[derive(Debug, thiserror::Error)]
pub enum HashingError {
    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password is longer than {} bytes", MAX_PASSWORD_BYTES)]
    TooLong,

    /// The worker running the hash did not complete.
    #[error("password hashing interrupted: {0}")]
    Interrupted(String),
}

/// Hashed password as stored in the `password` field of a user document.
///
/// Never contains plaintext. `Debug` is redacted so the secret does not end
/// up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordSecret(String);

impl PasswordSecret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordSecret(<redacted>)")
    }
}

/// Hash a plaintext password.
///
/// Fails with [`HashingError::TooLong`] above [`MAX_PASSWORD_BYTES`].
pub fn hash_password(plaintext: &str) -> Result<PasswordSecret, HashingError> {
    match bcrypt::non_truncating_hash(plaintext, HASH_COST) {
        Ok(hash) => Ok(PasswordSecret(hash)),
        Err(bcrypt::BcryptError::Truncation(_)) => Err(HashingError::TooLong),
        Err(e) => Err(e.into()),
    }
}

/// Check a plaintext password against a stored secret.
///
/// A malformed secret or an over-long candidate is reported as a mismatch
/// rather than an error.
pub fn verify_password(plaintext: &str, secret: &PasswordSecret) -> bool {
    match bcrypt::non_truncating_verify(plaintext, secret.as_str()) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "stored password secret could not be checked");
            false
        }
    }
}

/// Spend one verification on a login for a username that does not exist.
///
/// Always a mismatch.
pub fn verify_unknown_user(plaintext: &str) -> bool {
    if let Some(secret) = UNKNOWN_USER_SECRET.as_ref() {
        let _ = verify_password(plaintext, secret);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let secret = hash_password("wonderland").unwrap();
        assert!(verify_password("wonderland", &secret));
    }

    #[test]
    fn mutated_password_does_not_verify() {
        let secret = hash_password("wonderland").unwrap();
        for candidate in ["Wonderland", "wonderland ", "wonderlan", "", "looking-glass"] {
            assert!(!verify_password(candidate, &secret), "{candidate:?} matched");
        }
    }

    #[test]
    fn secret_is_salted_and_self_describing() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("$2"));
        assert!(!a.as_str().contains("same"));
    }

    #[test]
    fn passwords_past_the_bcrypt_limit_are_refused() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(hash_password(&prefix).is_ok());
        let long = format!("{prefix}wonderland");
        assert!(matches!(hash_password(&long), Err(HashingError::TooLong)));
    }

    #[test]
    fn long_candidate_sharing_a_prefix_does_not_verify() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let secret = hash_password(&prefix).unwrap();
        assert!(verify_password(&prefix, &secret));
        assert!(!verify_password(&format!("{prefix}looking-glass"), &secret));
    }

    #[test]
    fn unknown_user_check_runs_a_real_round() {
        let secret = UNKNOWN_USER_SECRET.as_ref().unwrap();
        assert!(secret.as_str().starts_with(&format!("$2b${HASH_COST:02}$")));
        assert!(!verify_unknown_user("no-such-user"));
    }

    #[test]
    fn malformed_secret_is_a_mismatch() {
        let secret = PasswordSecret("not-a-bcrypt-hash".to_string());
        assert!(!verify_password("anything", &secret));
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = hash_password("wonderland").unwrap();
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains(secret.as_str()));
    }
}
