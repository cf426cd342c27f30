// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Maps usernames to stable user IDs and creates new accounts. Records live
//! in the `user` collection of the injected [`DocumentStore`]:
//!
//! ```text
//! { "_id": "<uuid>", "username": "alice", "password": "$2b$14$..." }
//! ```
//!
//! Username uniqueness is enforced by the store's unique index on
//! `username`, not re-checked here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::password::{
    hash_password, verify_password, verify_unknown_user, HashingError, PasswordSecret,
};
use crate::storage::{Document, DocumentStore, Filter, StoreError};

/// Collection holding user records.
pub const USER_COLLECTION: &str = "user";

/// Field used for login lookups; carries a unique index.
pub const USERNAME_FIELD: &str = "username";

/// Stored user record. Only used inside this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    password: PasswordSecret,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// No user with the requested username
    #[error("user not found")]
    NotFound,

    /// Storage failed for a reason other than a missing record
    #[error("user store failure: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Hashing(#[from] HashingError),
}

pub type UserResult<T> = Result<T, UserError>;

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    /// Create a repository over a shared store handle.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a user and return its new ID.
    ///
    /// Fails with [`UserError::Persistence`] if the username is already taken.
    pub async fn create_user(&self, username: &str, password: &str) -> UserResult<String> {
        let plaintext = password.to_string();
        let secret = tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| HashingError::Interrupted(e.to_string()))??;

        let record = UserDocument {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: secret,
        };
        let document = match serde_json::to_value(&record).map_err(StoreError::from)? {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::InvalidDocument("user record is not an object".into()).into())
            }
        };

        let store = Arc::clone(&self.store);
        let id = tokio::task::spawn_blocking(move || store.insert_one(USER_COLLECTION, document))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))??;

        tracing::info!(user_id = %id, username, "user created");
        Ok(id)
    }

    /// Look up the ID of the user with the given username.
    pub async fn find_id_by_username(&self, username: &str) -> UserResult<String> {
        let record = self.find_by_username(username).await?.ok_or(UserError::NotFound)?;
        if record.id.is_empty() {
            return Err(UserError::NotFound);
        }
        Ok(record.id)
    }

    /// Check a username/password pair.
    ///
    /// An unknown username is `Ok(false)`. Any storage failure, including a
    /// record that cannot be decoded, is returned to the caller instead of
    /// being treated as a mismatch.
    pub async fn authenticate(&self, username: &str, password: &str) -> UserResult<bool> {
        let record = self.find_by_username(username).await?;

        // Unknown users still pay for one bcrypt round.
        let plaintext = password.to_string();
        let matches = tokio::task::spawn_blocking(move || match record {
            Some(record) => verify_password(&plaintext, &record.password),
            None => verify_unknown_user(&plaintext),
        })
        .await
        .map_err(|e| HashingError::Interrupted(e.to_string()))?;
        Ok(matches)
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<UserDocument>> {
        let store = Arc::clone(&self.store);
        let filter = Filter::eq(USERNAME_FIELD, username);
        let found = tokio::task::spawn_blocking(move || store.find_one(USER_COLLECTION, &filter))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))??;

        found.map(decode_user).transpose().map_err(UserError::from)
    }
}

fn decode_user(document: Document) -> Result<UserDocument, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
