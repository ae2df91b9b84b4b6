//! Tabular store abstraction.
//!
//! The ledger is persisted as whole tables: every save replaces all rows of
//! the named table with a header row plus one row per record. There is no
//! partial write and no concurrency control; the last writer wins.

pub mod csv_store;
pub mod memory;

pub use csv_store::CsvStore;
pub use memory::InMemoryStore;

use thiserror::Error;

use crate::models::Table;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Row {row} of table '{table}' has {found} cells, header has {expected}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole-table persistence.
pub trait TabularStore {
    /// Loads every row of `table` in stored order.
    fn load(&self, table: &str) -> Result<Table, StoreError>;

    /// Replaces the entire contents of `table`.
    fn save(&self, table: &str, contents: &Table) -> Result<(), StoreError>;
}

impl<S: TabularStore + ?Sized> TabularStore for &S {
    fn load(&self, table: &str) -> Result<Table, StoreError> {
        (**self).load(table)
    }

    fn save(&self, table: &str, contents: &Table) -> Result<(), StoreError> {
        (**self).save(table, contents)
    }
}

impl<S: TabularStore + ?Sized> TabularStore for std::sync::Arc<S> {
    fn load(&self, table: &str) -> Result<Table, StoreError> {
        (**self).load(table)
    }

    fn save(&self, table: &str, contents: &Table) -> Result<(), StoreError> {
        (**self).save(table, contents)
    }
}
