#![allow(dead_code)]

use chrono::NaiveDate;
use purchase_ledger::{
    InMemoryStore, LedgerService, NewRequest, Table, TrackerConfig,
};
use rust_decimal::Decimal;

pub const REQUEST_DATE: (i32, u32, u32) = (2024, 5, 1);

pub fn request_date() -> NaiveDate {
    let (y, m, d) = REQUEST_DATE;
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn catalog() -> Table {
    let mut table = Table::new(["No.", "Description", "Unit"]);
    table.push_row(["IT-1", "Phoropter 123", "ea"]);
    table.push_row(["IT-2", "Trial lens set", "set"]);
    table.push_row(["IT-3", "Contact LENS case", "ea"]);
    table.push_row(["IT-4", "Visual chart", "ea"]);
    table.push_row(["IT-5", "Lensmeter YPC100", "ea"]);
    table
}

/// Ledger service over an in-memory store seeded with the test catalog.
pub struct TestLedger {
    pub service: LedgerService<InMemoryStore>,
}

impl TestLedger {
    pub fn new() -> Self {
        let store = InMemoryStore::new().with_table("Item Data", catalog());
        Self {
            service: LedgerService::new(store, TrackerConfig::default()),
        }
    }

    pub fn request(&self, item_no: &str, quantity: Decimal) -> String {
        self.service
            .create_request(NewRequest {
                item_no: item_no.to_string(),
                quantity,
                priority: None,
                back_order: None,
                request_date: request_date(),
            })
            .expect("create request")
    }
}
