//! Purchase Ledger Library
//!
//! Tracks purchase requests through requisition, purchase order and receipt
//! in a single tabular ledger. The lifecycle engine is pure; persistence goes
//! through the [`store::TabularStore`] trait.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod store;

pub use config::{init_tracing, load_config, TrackerConfig, TrackerConfigError};
pub use errors::ServiceError;
pub use lifecycle::{ReceiveQuantity, StatusEvent};
pub use models::{OrderRecord, RecordKey, Stage, Status, Table};
pub use services::{DashboardSummary, LedgerFilter, LedgerService, NewRequest};
pub use store::{CsvStore, InMemoryStore, StoreError, TabularStore};
