use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use super::{StoreError, TabularStore};
use crate::models::Table;

/// Directory of CSV files, one `<table>.csv` per table.
///
/// Saves go through a temporary file and a rename, so readers see either the
/// previous table or the new one.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.csv", table))
    }
}

impl TabularStore for CsvStore {
    fn load(&self, table: &str) -> Result<Table, StoreError> {
        let path = self.path_for(table);
        if !path.exists() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(StoreError::RaggedRow {
                    table: table.to_string(),
                    row: index + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(table, rows = rows.len(), "Loaded table");
        Ok(Table::new(columns).with_rows(rows))
    }

    fn save(&self, table: &str, contents: &Table) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(table);
        let tmp = path.with_extension("csv.tmp");

        let write = || -> Result<(), StoreError> {
            let mut writer = csv::Writer::from_path(&tmp)?;
            writer.write_record(contents.columns())?;
            for row in contents.normalized_rows() {
                writer.write_record(&row)?;
            }
            writer.flush()?;
            Ok(())
        };

        if let Err(e) = write() {
            error!(table, error = %e, "Failed to write table");
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        fs::rename(&tmp, &path)?;
        debug!(table, rows = contents.len(), "Saved table");
        Ok(())
    }
}
