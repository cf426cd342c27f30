// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! A small collection-oriented document store. Documents are JSON objects
//! keyed by a string `_id`; collections are created on first insert.
//!
//! ## Access Patterns
//!
//! The service only ever issues two operations against a collection:
//!
//! - `insert_one` - persist a new document, rejecting duplicate `_id`s and
//!   duplicate values on any unique index
//! - `find_one` - return the first document matching an equality filter
//!
//! ## Backends
//!
//! - [`RedbDocumentStore`] - embedded ACID database on disk (production)
//! - [`MemoryDocumentStore`] - process-local maps (tests, ephemeral runs)
//!
//! Both backends are synchronous. Async callers are expected to move calls
//! onto the blocking pool (see `auth::users`).

pub mod document;
pub mod error;
pub mod memory;
pub mod redb_store;

pub use document::{Document, Filter, ID_FIELD};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryDocumentStore;
pub use redb_store::RedbDocumentStore;

/// Collection-style access to a document database.
///
/// Implementations must be safe to share between concurrently running
/// requests; the handle is long-lived and owned by the process bootstrap.
pub trait DocumentStore: Send + Sync {
    /// Insert a document into `collection` and return its `_id`.
    ///
    /// A document without an `_id` is assigned a fresh UUID.
    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<String>;

    /// Return the first document in `collection` matching `filter`.
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Check that the store is reachable.
    fn ping(&self) -> StoreResult<()>;
}
