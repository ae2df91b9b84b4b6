use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::cell::parse_cell;
use super::status::{Stage, Status};

pub const REQUEST_ID_COLUMN: &str = "Request_ID";
pub const PR_ID_COLUMN: &str = "PR_ID";
pub const PO_ID_COLUMN: &str = "PO_ID";
pub const PRIORITY_COLUMN: &str = "Priority";
pub const REQUEST_DATE_COLUMN: &str = "Request_Date";
pub const STATUS_COLUMN: &str = "Status";
pub const ITEM_NO_COLUMN: &str = "Item_No";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const QUANTITY_COLUMN: &str = "Quantity";
pub const QUANTITY_RECEIVED_COLUMN: &str = "Quantity_Received";
pub const OUTSTANDING_QUANTITY_COLUMN: &str = "Outstanding_Quantity";
pub const QTY_TO_RECEIVE_COLUMN: &str = "Qty_to_Receive";
pub const VENDOR_NO_COLUMN: &str = "Vendor_No";
pub const VENDOR_NAME_COLUMN: &str = "Vendor_Name";
pub const BACK_ORDER_COLUMN: &str = "Back_order";

/// Column order used when the ledger table is rewritten.
pub const LEDGER_COLUMNS: &[&str] = &[
    REQUEST_ID_COLUMN,
    PR_ID_COLUMN,
    PO_ID_COLUMN,
    PRIORITY_COLUMN,
    REQUEST_DATE_COLUMN,
    STATUS_COLUMN,
    ITEM_NO_COLUMN,
    DESCRIPTION_COLUMN,
    QUANTITY_COLUMN,
    QUANTITY_RECEIVED_COLUMN,
    OUTSTANDING_QUANTITY_COLUMN,
    QTY_TO_RECEIVE_COLUMN,
    VENDOR_NO_COLUMN,
    VENDOR_NAME_COLUMN,
    BACK_ORDER_COLUMN,
];

/// One ledger row as stored: cell text keyed by column name.
pub type SheetRow = BTreeMap<String, String>;

/// One row of the unified Request / PR / PO ledger.
///
/// Numeric and date cells are read leniently. A cell that does not parse
/// reads as `None` and its text is kept in `unparsed`, so rewriting the
/// ledger puts it back verbatim unless the field was given a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SheetRow", into = "SheetRow")]
pub struct OrderRecord {
    pub request_id: String,
    pub pr_id: String,
    pub po_id: String,
    pub priority: String,
    pub request_date: Option<NaiveDate>,
    pub status: Status,
    pub item_no: String,
    pub description: String,
    pub quantity: Option<Decimal>,
    pub quantity_received: Option<Decimal>,
    pub outstanding_quantity: Option<Decimal>,
    pub qty_to_receive: Option<Decimal>,
    pub vendor_no: String,
    pub vendor_name: String,
    pub back_order: String,
    /// Columns this crate does not model, carried through rewrites untouched.
    pub extra: BTreeMap<String, String>,
    /// Original text of typed cells that failed to parse, by column.
    pub unparsed: BTreeMap<String, String>,
}

impl TryFrom<SheetRow> for OrderRecord {
    type Error = String;

    fn try_from(mut row: SheetRow) -> Result<Self, Self::Error> {
        let mut unparsed = BTreeMap::new();
        let mut take = |column: &str| row.remove(column).unwrap_or_default();

        let request_id = take(REQUEST_ID_COLUMN);
        let pr_id = take(PR_ID_COLUMN);
        let po_id = take(PO_ID_COLUMN);
        let priority = take(PRIORITY_COLUMN);
        let request_date = typed(REQUEST_DATE_COLUMN, take(REQUEST_DATE_COLUMN), &mut unparsed);
        let status = Status::from_cell(&take(STATUS_COLUMN))?;
        let item_no = take(ITEM_NO_COLUMN);
        let description = take(DESCRIPTION_COLUMN);
        let quantity = typed(QUANTITY_COLUMN, take(QUANTITY_COLUMN), &mut unparsed);
        let quantity_received = typed(
            QUANTITY_RECEIVED_COLUMN,
            take(QUANTITY_RECEIVED_COLUMN),
            &mut unparsed,
        );
        let outstanding_quantity = typed(
            OUTSTANDING_QUANTITY_COLUMN,
            take(OUTSTANDING_QUANTITY_COLUMN),
            &mut unparsed,
        );
        let qty_to_receive = typed(QTY_TO_RECEIVE_COLUMN, take(QTY_TO_RECEIVE_COLUMN), &mut unparsed);
        let vendor_no = take(VENDOR_NO_COLUMN);
        let vendor_name = take(VENDOR_NAME_COLUMN);
        let back_order = take(BACK_ORDER_COLUMN);

        Ok(Self {
            request_id,
            pr_id,
            po_id,
            priority,
            request_date,
            status,
            item_no,
            description,
            quantity,
            quantity_received,
            outstanding_quantity,
            qty_to_receive,
            vendor_no,
            vendor_name,
            back_order,
            extra: row,
            unparsed,
        })
    }
}

impl From<OrderRecord> for SheetRow {
    fn from(record: OrderRecord) -> Self {
        let unparsed = &record.unparsed;
        let mut row = record.extra.clone();
        let mut put = |column: &str, value: String| {
            row.insert(column.to_string(), value);
        };

        put(REQUEST_ID_COLUMN, record.request_id);
        put(PR_ID_COLUMN, record.pr_id);
        put(PO_ID_COLUMN, record.po_id);
        put(PRIORITY_COLUMN, record.priority);
        put(REQUEST_DATE_COLUMN, cell_text(REQUEST_DATE_COLUMN, &record.request_date, unparsed));
        put(STATUS_COLUMN, record.status.to_string());
        put(ITEM_NO_COLUMN, record.item_no);
        put(DESCRIPTION_COLUMN, record.description);
        put(QUANTITY_COLUMN, cell_text(QUANTITY_COLUMN, &record.quantity, unparsed));
        put(
            QUANTITY_RECEIVED_COLUMN,
            cell_text(QUANTITY_RECEIVED_COLUMN, &record.quantity_received, unparsed),
        );
        put(
            OUTSTANDING_QUANTITY_COLUMN,
            cell_text(OUTSTANDING_QUANTITY_COLUMN, &record.outstanding_quantity, unparsed),
        );
        put(
            QTY_TO_RECEIVE_COLUMN,
            cell_text(QTY_TO_RECEIVE_COLUMN, &record.qty_to_receive, unparsed),
        );
        put(VENDOR_NO_COLUMN, record.vendor_no);
        put(VENDOR_NAME_COLUMN, record.vendor_name);
        put(BACK_ORDER_COLUMN, record.back_order);
        row
    }
}

fn typed<T: FromStr>(column: &str, raw: String, unparsed: &mut BTreeMap<String, String>) -> Option<T> {
    let value = parse_cell(&raw);
    if value.is_none() && !raw.trim().is_empty() {
        unparsed.insert(column.to_string(), raw);
    }
    value
}

/// A parsed value wins; otherwise the original unparsed text, otherwise blank.
fn cell_text<T: fmt::Display>(
    column: &str,
    value: &Option<T>,
    unparsed: &BTreeMap<String, String>,
) -> String {
    match value {
        Some(v) => v.to_string(),
        None => unparsed.get(column).cloned().unwrap_or_default(),
    }
}

impl OrderRecord {
    pub fn stage(&self) -> Stage {
        Stage::from_ids(&self.pr_id, &self.po_id)
    }

    pub fn is_bare_request(&self) -> bool {
        self.stage() == Stage::Request
    }

    pub fn is_awaiting_po(&self) -> bool {
        self.stage() == Stage::PurchaseRequisition
    }

    pub fn is_po_line(&self) -> bool {
        self.stage() == Stage::PurchaseOrder
    }

    /// Original text of a typed cell that did not parse.
    pub fn unparsed_cell(&self, column: &str) -> Option<&str> {
        self.unparsed.get(column).map(String::as_str)
    }

    /// Received total, with a blank cell read as nothing received yet.
    pub fn received(&self) -> Decimal {
        self.quantity_received.unwrap_or(Decimal::ZERO)
    }

    /// Recomputes the two derived quantity columns from ordered and received.
    pub fn refresh_outstanding(&mut self) {
        let outstanding = self
            .quantity
            .map(|ordered| outstanding_for(ordered, self.received()));
        self.outstanding_quantity = outstanding;
        self.qty_to_receive = outstanding;
    }

    /// The key presentation layers use to address this row.
    pub fn key(&self) -> RecordKey {
        if self.is_po_line() {
            RecordKey::line(&self.po_id, &self.item_no)
        } else {
            RecordKey::request(&self.request_id)
        }
    }
}

/// `max(ordered - received, 0)`.
pub fn outstanding_for(ordered: Decimal, received: Decimal) -> Decimal {
    (ordered - received).max(Decimal::ZERO)
}

/// Identifier tuple addressing one or more ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKey {
    Request { request_id: String },
    Line { po_id: String, item_no: String },
}

impl RecordKey {
    pub fn request(request_id: impl Into<String>) -> Self {
        RecordKey::Request {
            request_id: request_id.into(),
        }
    }

    pub fn line(po_id: impl Into<String>, item_no: impl Into<String>) -> Self {
        RecordKey::Line {
            po_id: po_id.into(),
            item_no: item_no.into(),
        }
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        match self {
            RecordKey::Request { request_id } => record.request_id == *request_id,
            RecordKey::Line { po_id, item_no } => {
                !po_id.is_empty() && record.po_id == *po_id && record.item_no == *item_no
            }
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Request { request_id } => write!(f, "request {}", request_id),
            RecordKey::Line { po_id, item_no } => write!(f, "PO line {}/{}", po_id, item_no),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(pr_id: &str, po_id: &str) -> OrderRecord {
        OrderRecord {
            request_id: "REQ-0001".into(),
            pr_id: pr_id.into(),
            po_id: po_id.into(),
            item_no: "IT-1".into(),
            quantity: Some(dec!(5)),
            ..Default::default()
        }
    }

    #[test]
    fn outstanding_is_floored_at_zero() {
        assert_eq!(outstanding_for(dec!(5), dec!(3)), dec!(2));
        assert_eq!(outstanding_for(dec!(5), dec!(8)), Decimal::ZERO);
    }

    #[test]
    fn refresh_keeps_derived_columns_equal() {
        let mut r = record("", "");
        r.quantity_received = Some(dec!(1));
        r.refresh_outstanding();
        assert_eq!(r.outstanding_quantity, Some(dec!(4)));
        assert_eq!(r.qty_to_receive, r.outstanding_quantity);
    }

    #[test]
    fn refresh_without_quantity_clears_derived_columns() {
        let mut r = record("", "");
        r.quantity = None;
        r.outstanding_quantity = Some(dec!(9));
        r.refresh_outstanding();
        assert_eq!(r.outstanding_quantity, None);
        assert_eq!(r.qty_to_receive, None);
    }

    #[test]
    fn key_follows_stage() {
        assert_eq!(record("", "").key(), RecordKey::request("REQ-0001"));
        assert_eq!(record("PR-0001", "").key(), RecordKey::request("REQ-0001"));
        assert_eq!(
            record("PR-0001", "PO-9").key(),
            RecordKey::line("PO-9", "IT-1")
        );
    }

    fn sheet_row(cells: &[(&str, &str)]) -> SheetRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn blank_status_reads_as_requested() {
        let record =
            OrderRecord::try_from(sheet_row(&[("Request_ID", "REQ-0002"), ("Status", "")])).unwrap();
        assert_eq!(record.status, Status::Requested);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = OrderRecord::try_from(sheet_row(&[("Status", "shipped")])).unwrap_err();
        assert_eq!(err, "unknown status 'shipped'");
    }

    #[test]
    fn unparsed_cells_are_written_back_verbatim() {
        let record = OrderRecord::try_from(sheet_row(&[
            ("Request_ID", "REQ-0002"),
            ("Quantity", "1,000"),
            ("Request_Date", "15/01/2024"),
            ("Quantity_Received", ""),
            ("Lead_Time_Status", "overdue"),
        ]))
        .unwrap();
        assert_eq!(record.quantity, None);
        assert_eq!(record.request_date, None);
        assert_eq!(record.unparsed_cell("Quantity"), Some("1,000"));
        assert_eq!(record.unparsed_cell("Quantity_Received"), None);

        let row = SheetRow::from(record);
        assert_eq!(row["Quantity"], "1,000");
        assert_eq!(row["Request_Date"], "15/01/2024");
        assert_eq!(row["Quantity_Received"], "");
        assert_eq!(row["Lead_Time_Status"], "overdue");
    }

    #[test]
    fn a_new_value_replaces_unparsed_text() {
        let mut record =
            OrderRecord::try_from(sheet_row(&[("Quantity_Received", "two")])).unwrap();
        record.quantity_received = Some(dec!(2));
        assert_eq!(SheetRow::from(record)["Quantity_Received"], "2");
    }

    #[test]
    fn line_key_never_matches_unpromoted_rows() {
        let key = RecordKey::line("", "IT-1");
        assert!(!key.matches(&record("", "")));
    }
}
