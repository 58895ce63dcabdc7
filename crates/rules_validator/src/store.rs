//! In-memory record store.
//!
//! [`InMemoryStore`] answers `unique` lookups from rows held in memory. It is
//! handy for tests, fixtures and the CLI; applications backed by a database
//! implement [`RecordStore`] over their own connection instead.

use rules_core::{DataBag, DataValue, Exclusion, RecordStore, StoreError};
use std::collections::BTreeMap;
use tracing::debug;

/// Tables of rows held in memory.
///
/// # Example
///
/// ```rust
/// use rules_core::{DataValue, RecordStore};
/// use rules_validator::InMemoryStore;
/// use serde_json::json;
///
/// let store = InMemoryStore::from_json(json!({
///     "users": [{ "id": 1, "email": "a@b.com" }]
/// }))
/// .unwrap();
///
/// let taken = store
///     .value_exists("users", "email", &DataValue::from("a@b.com"), None)
///     .unwrap();
/// assert!(taken);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: BTreeMap<String, Vec<DataBag>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table without rows.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.tables.entry(table.into()).or_default();
        self
    }

    /// Adds a row, creating the table if needed.
    pub fn insert(&mut self, table: impl Into<String>, row: DataBag) {
        self.tables.entry(table.into()).or_default().push(row);
    }

    /// Builds a store from a JSON object mapping table names to row arrays.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StoreError> {
        let tables = match value {
            serde_json::Value::Object(tables) => tables,
            _ => {
                return Err(StoreError::Backend(
                    "store fixture must be an object of tables".to_string(),
                ));
            }
        };

        let mut store = Self::new();
        for (table, rows) in tables {
            let rows = match rows {
                serde_json::Value::Array(rows) => rows,
                _ => {
                    return Err(StoreError::Backend(format!(
                        "table '{}' must be an array of rows",
                        table
                    )));
                }
            };

            store.tables.entry(table.clone()).or_default();
            for row in rows {
                match DataValue::from(row) {
                    DataValue::Map(row) => store.insert(table.clone(), row),
                    other => {
                        return Err(StoreError::Backend(format!(
                            "row in table '{}' must be an object, found {}",
                            table,
                            other.type_name()
                        )));
                    }
                }
            }
        }

        Ok(store)
    }

    /// Returns the number of rows in a table.
    pub fn len(&self, table: &str) -> Option<usize> {
        self.tables.get(table).map(Vec::len)
    }

    /// Returns an iterator over table names.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Compares a stored value with a submitted one.
///
/// Nulls never match. Scalars also match by textual form so that a numeric
/// column matches a numeric string; lists and maps only match exactly.
fn same_value(stored: &DataValue, submitted: &DataValue) -> bool {
    match (stored, submitted) {
        (DataValue::Null, _) | (_, DataValue::Null) => false,
        (DataValue::List(_) | DataValue::Map(_), _)
        | (_, DataValue::List(_) | DataValue::Map(_)) => stored == submitted,
        _ => stored == submitted || stored.to_text() == submitted.to_text(),
    }
}

impl RecordStore for InMemoryStore {
    fn value_exists(
        &self,
        table: &str,
        column: &str,
        value: &DataValue,
        except: Option<&Exclusion>,
    ) -> Result<bool, StoreError> {
        let rows = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;

        let exists = rows
            .iter()
            .filter(|row| match except {
                Some(exclusion) => !row
                    .get(&exclusion.id_column)
                    .is_some_and(|id| exclusion.id.matches(id)),
                None => true,
            })
            .any(|row| row.get(column).is_some_and(|stored| same_value(stored, value)));

        debug!(table, column, rows = rows.len(), exists, "In-memory lookup");
        Ok(exists)
    }
}
