pub mod catalog;
pub mod cell;
pub mod record;
pub mod status;
pub mod table;

pub use catalog::{CatalogItem, CATALOG_DESCRIPTION_COLUMN, CATALOG_NO_COLUMN};
pub use record::{
    outstanding_for, OrderRecord, RecordKey, SheetRow, LEDGER_COLUMNS, QUANTITY_COLUMN,
    QUANTITY_RECEIVED_COLUMN,
};
pub use status::{Stage, Status, OPEN_REQUEST_STATUSES};
pub use table::{RowRef, Table};
