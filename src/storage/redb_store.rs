// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `<collection>`: `_id` → serialized document (JSON bytes)
//! - `<collection>.<field>`: unique index, field value (compact JSON) → `_id`
//!
//! Tables are created on first write. Reads against a collection that was
//! never written behave as an empty collection.

use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadOnlyTable, ReadTransaction, TableDefinition,
    TableError,
};

use super::document::{ensure_id, index_key};
use super::{Document, DocumentStore, Filter, StoreError, StoreResult, ID_FIELD};

// =============================================================================
// Table Definitions
// =============================================================================

fn collection_table(collection: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(collection)
}

fn index_table(name: &str) -> TableDefinition<'_, &'static str, &'static str> {
    TableDefinition::new(name)
}

fn index_table_name(collection: &str, field: &str) -> String {
    format!("{collection}.{field}")
}

/// Open a table for reading, treating a missing table as absent.
fn open_read<K, V>(
    txn: &ReadTransaction,
    definition: TableDefinition<'_, K, V>,
) -> StoreResult<Option<ReadOnlyTable<K, V>>>
where
    K: redb::Key + 'static,
    V: redb::Value + 'static,
{
    match txn.open_table(definition) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// RedbDocumentStore
// =============================================================================

/// Document store persisted in a single redb file.
pub struct RedbDocumentStore {
    db: Database,
    /// `(collection, field)` pairs with a unique index.
    unique: Vec<(String, String)>,
}

impl RedbDocumentStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;
        Ok(Self {
            db,
            unique: Vec::new(),
        })
    }

    /// Declare a unique index on `collection.field`.
    ///
    /// The index is maintained for documents inserted from now on; existing
    /// documents are not backfilled.
    pub fn with_unique_index(mut self, collection: &str, field: &str) -> Self {
        self.unique
            .push((collection.to_string(), field.to_string()));
        self
    }

    fn unique_fields<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.unique
            .iter()
            .filter(move |(c, _)| c == collection)
            .map(|(_, f)| f.as_str())
    }

    fn is_unique(&self, collection: &str, field: &str) -> bool {
        self.unique_fields(collection).any(|f| f == field)
    }

    fn decode(bytes: &[u8]) -> StoreResult<Document> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl DocumentStore for RedbDocumentStore {
    fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;
        let json = serde_json::to_vec(&document)?;

        // (field, index table, key) for every unique field the document carries
        let index_entries: Vec<(String, String, String)> = self
            .unique_fields(collection)
            .filter_map(|field| {
                document.get(field).map(|value| {
                    (
                        field.to_string(),
                        index_table_name(collection, field),
                        index_key(value),
                    )
                })
            })
            .collect();

        let write_txn = self.db.begin_write()?;
        {
            let mut docs = write_txn.open_table(collection_table(collection))?;
            if docs.get(id.as_str())?.is_some() {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: ID_FIELD.to_string(),
                    value: id,
                });
            }

            for (field, table_name, key) in &index_entries {
                let mut idx = write_txn.open_table(index_table(table_name))?;
                if idx.get(key.as_str())?.is_some() {
                    return Err(StoreError::Duplicate {
                        collection: collection.to_string(),
                        field: field.clone(),
                        value: key.clone(),
                    });
                }
                idx.insert(key.as_str(), id.as_str())?;
            }

            docs.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(collection, id = %id, "document inserted");
        Ok(id)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let Some(docs) = open_read(&read_txn, collection_table(collection))? else {
            return Ok(None);
        };

        if self.is_unique(collection, filter.field()) {
            let name = index_table_name(collection, filter.field());
            let Some(idx) = open_read(&read_txn, index_table(&name))? else {
                return Ok(None);
            };
            let key = index_key(filter.value());
            let Some(id) = idx.get(key.as_str())?.map(|g| g.value().to_string()) else {
                return Ok(None);
            };
            return match docs.get(id.as_str())? {
                Some(value) => Ok(Some(Self::decode(value.value())?)),
                None => Ok(None),
            };
        }

        if filter.field() == ID_FIELD {
            if let Some(id) = filter.value().as_str() {
                return match docs.get(id)? {
                    Some(value) => Ok(Some(Self::decode(value.value())?)),
                    None => Ok(None),
                };
            }
        }

        for entry in docs.iter()? {
            let (_, value) = entry?;
            let document = Self::decode(value.value())?;
            if filter.matches(&document) {
                return Ok(Some(document));
            }
        }
        Ok(None)
    }

    fn ping(&self) -> StoreResult<()> {
        self.db.begin_read()?;
        Ok(())
    }
}
