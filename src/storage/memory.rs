// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory document store.
//!
//! Same semantics as the redb backend, including unique indexes, but nothing
//! survives the process. Used by tests and `STORE_BACKEND=memory`.

use std::collections::HashMap;
use std::sync::RwLock;

use super::document::{ensure_id, index_key};
use super::{Document, DocumentStore, Filter, StoreError, StoreResult, ID_FIELD};

#[derive(Default)]
struct Collection {
    /// Insertion-ordered documents.
    documents: Vec<Document>,
    /// field → (index key → `_id`)
    indexes: HashMap<String, HashMap<String, String>>,
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    unique: Vec<(String, String)>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a unique index on `collection.field`.
    pub fn with_unique_index(mut self, collection: &str, field: &str) -> Self {
        self.unique
            .push((collection.to_string(), field.to_string()));
        self
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let entry = collections.entry(collection.to_string()).or_default();

        if entry
            .documents
            .iter()
            .any(|d| d.get(ID_FIELD).and_then(|v| v.as_str()) == Some(id.as_str()))
        {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: ID_FIELD.to_string(),
                value: id,
            });
        }

        let mut keys = Vec::new();
        for (_, field) in self.unique.iter().filter(|(c, _)| c == collection) {
            let Some(value) = document.get(field) else {
                continue;
            };
            let key = index_key(value);
            let taken = entry
                .indexes
                .get(field)
                .is_some_and(|index| index.contains_key(&key));
            if taken {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: key,
                });
            }
            keys.push((field.clone(), key));
        }

        for (field, key) in keys {
            entry
                .indexes
                .entry(field)
                .or_default()
                .insert(key, id.clone());
        }
        entry.documents.push(document);
        Ok(id)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        let Some(entry) = collections.get(collection) else {
            return Ok(None);
        };
        Ok(entry
            .documents
            .iter()
            .find(|d| filter.matches(d))
            .cloned())
    }

    fn ping(&self) -> StoreResult<()> {
        self.collections
            .read()
            .map(|_| ())
            .map_err(|_| Self::poisoned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn user(id: &str, username: &str) -> Document {
        match json!({"_id": id, "username": username, "password": "x"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn insert_then_find() {
        let store = MemoryDocumentStore::new().with_unique_index("user", "username");
        store.insert_one("user", user("u-1", "alice")).unwrap();

        let found = store
            .find_one("user", &Filter::eq("username", "alice"))
            .unwrap()
            .unwrap();
        assert_eq!(found["_id"], "u-1");
        assert!(store
            .find_one("user", &Filter::eq("username", "bob"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn unique_index_distinguishes_json_types() {
        let store = MemoryDocumentStore::new().with_unique_index("user", "username");
        store.insert_one("user", user("u-1", "7")).unwrap();

        let mut numeric = user("u-2", "unused");
        numeric.insert("username".to_string(), json!(7));
        store.insert_one("user", numeric).unwrap();

        let found = store
            .find_one("user", &Filter::eq("username", 7))
            .unwrap()
            .unwrap();
        assert_eq!(found["_id"], "u-2");
    }

    #[test]
    fn unique_index_rejects_duplicates() {
        let store = MemoryDocumentStore::new().with_unique_index("user", "username");
        store.insert_one("user", user("u-1", "alice")).unwrap();
        let err = store.insert_one("user", user("u-2", "alice")).unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn without_index_duplicates_are_allowed() {
        let store = MemoryDocumentStore::new();
        store.insert_one("user", user("u-1", "alice")).unwrap();
        store.insert_one("user", user("u-2", "alice")).unwrap();
    }

    #[test]
    fn collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store.insert_one("user", user("u-1", "alice")).unwrap();
        assert!(store
            .find_one("contact", &Filter::eq("username", "alice"))
            .unwrap()
            .is_none());
    }
}
