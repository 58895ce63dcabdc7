//! Persisted record identity.
//!
//! The validator never loads records itself. It only needs to know, for an
//! existing record, which column holds its key and what the key value is, so
//! that uniqueness checks can skip the record's own row.

use crate::DataValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key column assumed when a record does not name one.
pub const DEFAULT_KEY_NAME: &str = "id";

/// Identifier of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer key
    Int(i64),
    /// Textual key (UUIDs, slugs, ...)
    Text(String),
}

impl RecordId {
    /// Returns true if a stored value refers to this identifier.
    ///
    /// Comparison is textual so that `Int(42)` matches a stored `"42"`.
    pub fn matches(&self, value: &DataValue) -> bool {
        match (self, value) {
            (RecordId::Int(id), DataValue::Int(v)) => id == v,
            (_, DataValue::Null) => false,
            _ => self.to_string() == value.to_text(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only canonical integers become `Int`; "007" or "+5" stay textual.
        Ok(match s.parse::<i64>() {
            Ok(i) if i.to_string() == s => RecordId::Int(i),
            _ => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        RecordId::Int(i)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// Access to the key of a persisted record.
///
/// Implement this for your model types. A record whose key value is `None`
/// has not been persisted yet and is validated like a new record.
pub trait Record {
    /// Name of the key column.
    fn key_name(&self) -> &str {
        DEFAULT_KEY_NAME
    }

    /// Current key value, if the record is persisted.
    fn key_value(&self) -> Option<RecordId>;
}

/// A record known only by its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    key_name: String,
    key_value: RecordId,
}

impl StoredRecord {
    /// Creates a record keyed on the default `id` column.
    pub fn new(key_value: impl Into<RecordId>) -> Self {
        Self {
            key_name: DEFAULT_KEY_NAME.to_string(),
            key_value: key_value.into(),
        }
    }

    /// Sets the key column name.
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }
}

impl Record for StoredRecord {
    fn key_name(&self) -> &str {
        &self.key_name
    }

    fn key_value(&self) -> Option<RecordId> {
        Some(self.key_value.clone())
    }
}

/// Row excluded from a uniqueness lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// Key column of the excluded row
    pub id_column: String,
    /// Key value of the excluded row
    pub id: RecordId,
}
