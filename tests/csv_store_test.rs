//! Ledger persistence through the CSV store.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use purchase_ledger::{
    CsvStore, LedgerService, NewRequest, RecordKey, ReceiveQuantity, ServiceError, Status, TabularStore,
    Table, TrackerConfig,
};
use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;

fn service(dir: &TempDir) -> LedgerService<CsvStore> {
    let store = CsvStore::new(dir.path());
    store.save("Item Data", &common::catalog()).unwrap();

    let config = TrackerConfig {
        data_dir: dir.path().to_path_buf(),
        ..TrackerConfig::default()
    };
    LedgerService::new(store, config)
}

#[test]
fn ledger_round_trips_with_blank_cells() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);

    let id = svc
        .create_request(NewRequest {
            item_no: "IT-3".into(),
            quantity: dec!(2.5),
            priority: Some("urgent".into()),
            back_order: None,
            request_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        })
        .unwrap();

    let raw = fs::read_to_string(dir.path().join("Ledger.csv")).unwrap();
    let mut lines = raw.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Request_ID,PR_ID,PO_ID,Priority,Request_Date,Status,Item_No,Description,Quantity,\
         Quantity_Received,Outstanding_Quantity,Qty_to_Receive,Vendor_No,Vendor_Name,Back_order"
    );
    assert_eq!(
        lines.next().unwrap(),
        "REQ-0001,,,urgent,2024-01-15,requested,IT-3,Contact LENS case,2.5,0,2.5,2.5,,,"
    );

    let records = svc.load_ledger().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, id);
    assert_eq!(records[0].quantity, Some(dec!(2.5)));
    assert_eq!(records[0].pr_id, "");
}

#[test]
fn unknown_columns_survive_a_rewrite() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Ledger.csv"),
        "Request_ID,Status,Quantity,Quantity_Received,Lead_Time_Status,Item_No\n\
         REQ-0007,requested,4,,overdue,IT-1\n\
         REQ-0008,quote-requested,not a number,,,IT-2\n",
    )
    .unwrap();
    let svc = service(&dir);

    let record = svc
        .receive(RecordKey::request("REQ-0007"), ReceiveQuantity::Delta(dec!(1)))
        .unwrap();
    assert_eq!(record.status, Status::Received);
    assert_eq!(record.outstanding_quantity, Some(dec!(3)));

    let table = svc.store().load("Ledger").unwrap();
    let header: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    assert_eq!(
        header[..6],
        ["Request_ID", "Status", "Quantity", "Quantity_Received", "Lead_Time_Status", "Item_No"]
    );
    assert_eq!(header.len(), 16);
    let first = table.row(0).unwrap();
    assert_eq!(first.get("Lead_Time_Status"), Some("overdue"));
    assert_eq!(first.get("Qty_to_Receive"), Some("3"));
    let second = table.row(1).unwrap();
    assert_eq!(second.get("Quantity"), Some("not a number"));
    assert_eq!(second.get("Status"), Some("quote-requested"));
}

#[test]
fn unreadable_cells_are_kept_and_block_receipts() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Ledger.csv"),
        "Request_ID,Status,Request_Date,Quantity,Item_No\n\
         REQ-0001,,15/01/2024,\"1,000\",IT-1\n\
         REQ-0002,requested,2024-01-16,2,IT-2\n",
    )
    .unwrap();
    let svc = service(&dir);

    let records = svc.load_ledger().unwrap();
    assert_eq!(records[0].status, Status::Requested);
    assert_eq!(records[0].quantity, None);
    assert_eq!(records[0].request_date, None);

    svc.receive(RecordKey::request("REQ-0002"), ReceiveQuantity::Delta(dec!(2)))
        .unwrap();
    let err = svc
        .receive(RecordKey::request("REQ-0001"), ReceiveQuantity::Delta(dec!(1)))
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(ref msg) if msg.contains("1,000"));

    let table = svc.store().load("Ledger").unwrap();
    let first = table.row(0).unwrap();
    assert_eq!(first.get("Quantity"), Some("1,000"));
    assert_eq!(first.get("Request_Date"), Some("15/01/2024"));
    assert_eq!(first.get("Status"), Some("requested"));
    assert_eq!(svc.dashboard().unwrap().open_requests, 1);
}

#[test]
fn missing_catalog_is_a_store_error() {
    let dir = TempDir::new().unwrap();
    let svc = LedgerService::new(CsvStore::new(dir.path()), TrackerConfig::default());

    let err = svc.search_catalog("lens").unwrap_err();
    assert!(!err.is_user_correctable());
    assert_eq!(err.code(), "store_error");
}

#[test]
fn tables_are_independent_files() {
    let dir = TempDir::new().unwrap();
    let store = CsvStore::new(dir.path().join("nested"));

    let mut enums = Table::new(["Priority"]);
    enums.push_row(["low"]);
    store.save("Enum Data", &enums).unwrap();

    assert!(dir.path().join("nested").join("Enum Data.csv").exists());
    assert_eq!(store.load("Enum Data").unwrap(), enums);
}
