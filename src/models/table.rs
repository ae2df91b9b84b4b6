use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// A whole sheet: ordered header plus ordered rows of string cells.
///
/// Rows may be shorter than the header; missing cells read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|cells| RowRef { table: self, cells })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(move |cells| RowRef { table: self, cells })
    }

    /// Rows padded to the header width, with missing cells as `""`.
    pub fn normalized_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        let width = self.columns.len();
        self.rows.iter().map(move |cells| {
            let mut row: Vec<String> = cells.iter().take(width).cloned().collect();
            row.resize(width, String::new());
            row
        })
    }

    /// Non-empty, de-duplicated values of one column in first-seen order.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for row in self.rows() {
            let value = row.get(column).unwrap_or_default().trim();
            if !value.is_empty() && !seen.iter().any(|s| s == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }

    /// Builds a table from serializable records.
    ///
    /// `base_columns` come first in the given order; any further keys the
    /// records produce are appended in sorted order.
    pub fn from_records<T: Serialize>(
        base_columns: &[&str],
        records: &[T],
    ) -> Result<Self, ServiceError> {
        Self::from_records_in_layout(base_columns, &[], records)
    }

    /// Like [`Table::from_records`], keeping the column order of an existing
    /// header.
    ///
    /// Columns of `layout` stay where they were. Base columns missing from it
    /// follow in base order, then any other keys in sorted order.
    pub fn from_records_in_layout<T: Serialize>(
        base_columns: &[&str],
        layout: &[String],
        records: &[T],
    ) -> Result<Self, ServiceError> {
        let mut maps = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::to_value(record)? {
                Value::Object(map) => maps.push(map),
                other => {
                    return Err(ServiceError::ValidationError(format!(
                        "record did not serialize to a row: {}",
                        other
                    )))
                }
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for column in layout.iter().map(String::as_str).chain(base_columns.iter().copied()) {
            if !column.is_empty() && !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
        let mut extra: Vec<String> = maps
            .iter()
            .flat_map(|map| map.keys())
            .filter(|key| !columns.iter().any(|c| c == *key))
            .cloned()
            .collect();
        extra.sort();
        extra.dedup();
        columns.extend(extra);

        let rows = maps
            .iter()
            .map(|map| {
                columns
                    .iter()
                    .map(|column| map.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Deserializes every row, reporting the first row that does not fit.
    pub fn to_records<T: DeserializeOwned>(&self) -> Result<Vec<T>, ServiceError> {
        self.rows()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(Value::Object(row.to_map())).map_err(|e| {
                    ServiceError::MalformedRecord {
                        row: index + 1,
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> RowRef<'a> {
    /// Cell value by column name; `None` when the column does not exist.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.table.column_index(column)?;
        Some(self.cells.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn get_at(&self, index: usize) -> &'a str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    fn to_map(self) -> Map<String, Value> {
        self.table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| (name.clone(), Value::String(self.get_at(i).to_string())))
            .collect()
    }
}
