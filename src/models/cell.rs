//! Lenient parsing of spreadsheet cells.
//!
//! Every cell in the tabular store is a string. Numeric and date columns are
//! read leniently: a blank or unparseable cell becomes `None` instead of
//! failing the whole table load.

use std::str::FromStr;
use tracing::warn;

/// Parses a single cell, treating blanks and garbage as missing.
pub fn parse_cell<T: FromStr>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(cell = %trimmed, "Unparseable cell treated as missing");
            None
        }
    }
}
