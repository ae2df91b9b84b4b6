use serde::{Deserialize, Serialize};

use super::table::RowRef;

pub const CATALOG_NO_COLUMN: &str = "No.";
pub const CATALOG_DESCRIPTION_COLUMN: &str = "Description";

/// A read-only entry of the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "No.")]
    pub item_no: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl CatalogItem {
    /// Extracts an item from a catalog row. Rows without an item number are skipped.
    pub fn from_row(row: &RowRef<'_>) -> Option<Self> {
        let item_no = row.get(CATALOG_NO_COLUMN)?.trim();
        if item_no.is_empty() {
            return None;
        }
        Some(Self {
            item_no: item_no.to_string(),
            description: row
                .get(CATALOG_DESCRIPTION_COLUMN)
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
    }

    /// Label shown in item pickers: `No. - Description`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.item_no, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    #[test]
    fn rows_without_item_number_are_skipped() {
        let mut table = Table::new(["No.", "Description"]);
        table.push_row(["IT-1", "Phoropter 123"]);
        table.push_row(["", "Orphan"]);

        let items: Vec<CatalogItem> = table.rows().filter_map(|r| CatalogItem::from_row(&r)).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), "IT-1 - Phoropter 123");
    }
}
