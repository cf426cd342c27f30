// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Documents and equality filters.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// Primary key field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Equality filter on a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    value: Value,
}

impl Filter {
    /// Match documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Check a document against this filter.
    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// Key under which a field value is stored in a unique index.
///
/// The compact JSON encoding, so `"7"` and `7` get different keys and an
/// indexed lookup agrees with [`Filter::matches`].
pub(crate) fn index_key(value: &Value) -> String {
    value.to_string()
}

/// Return the document's `_id`, assigning a new one if it has none.
pub(crate) fn ensure_id(document: &mut Document) -> StoreResult<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::String(_)) | None => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(other) => Err(StoreError::InvalidDocument(format!(
            "{ID_FIELD} must be a string, got {other}"
        ))),
    }
}
