use std::collections::HashMap;
use std::sync::RwLock;

use super::{StoreError, TabularStore};
use crate::models::Table;

/// Store backed by a map of tables, used in tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table, replacing any existing contents.
    pub fn with_table(self, name: impl Into<String>, table: Table) -> Self {
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.into(), table);
        self
    }

    /// Number of stored tables.
    pub fn table_count(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl TabularStore for InMemoryStore {
    fn load(&self, table: &str) -> Result<Table, StoreError> {
        self.tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn save(&self, table: &str, contents: &Table) -> Result<(), StoreError> {
        let normalized = Table::new(contents.columns().iter().cloned())
            .with_rows(contents.normalized_rows().collect());
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(table.to_string(), normalized);
        Ok(())
    }
}
