// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::api::graphql::{build_schema, ContactSchema};
use crate::auth::{TokenVerifier, UserRepository};
use crate::config::DEFAULT_LOOKUP_TIMEOUT;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub users: UserRepository,
    pub verifier: Arc<dyn TokenVerifier>,
    pub schema: ContactSchema,
    /// Upper bound on the identity lookup performed by the auth gate.
    pub lookup_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        let users = UserRepository::new(Arc::clone(&store));
        Self {
            schema: build_schema(users.clone()),
            store,
            users,
            verifier,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}
