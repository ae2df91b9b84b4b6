use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{OrderRecord, Status, OPEN_REQUEST_STATUSES};

/// Headline numbers and breakdowns for the ledger overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_requests: usize,
    pub open_requests: usize,
    pub total_po_lines: usize,
    pub received_po_lines: usize,
    /// Record count per status label, sorted by label
    pub status_counts: BTreeMap<String, usize>,
    /// Record count per priority, sorted by label; blank priorities are skipped
    pub priority_counts: BTreeMap<String, usize>,
}

pub fn summarize(records: &[OrderRecord]) -> DashboardSummary {
    let mut summary = DashboardSummary {
        total_requests: records.len(),
        ..Default::default()
    };

    for record in records {
        if OPEN_REQUEST_STATUSES.contains(&record.status) {
            summary.open_requests += 1;
        }
        if record.is_po_line() {
            summary.total_po_lines += 1;
            if record.status == Status::Received {
                summary.received_po_lines += 1;
            }
        }

        *summary
            .status_counts
            .entry(record.status.to_string())
            .or_default() += 1;

        let priority = record.priority.trim();
        if !priority.is_empty() {
            *summary
                .priority_counts
                .entry(priority.to_string())
                .or_default() += 1;
        }
    }

    summary
}

/// Days between the request date and `today`.
pub fn lead_days(record: &OrderRecord, today: NaiveDate) -> Option<i64> {
    record
        .request_date
        .map(|requested| (today - requested).num_days())
}

/// Age of one dated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadTime {
    pub request_id: String,
    pub item_no: String,
    pub status: Status,
    pub days: i64,
}

/// Lead times for every record with a known request date, in ledger order.
pub fn lead_times(records: &[OrderRecord], today: NaiveDate) -> Vec<LeadTime> {
    records
        .iter()
        .filter_map(|record| {
            lead_days(record, today).map(|days| LeadTime {
                request_id: record.request_id.clone(),
                item_no: record.item_no.clone(),
                status: record.status,
                days,
            })
        })
        .collect()
}

/// Narrowing criteria for ledger listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerFilter {
    pub status: Option<Status>,
    pub priority: Option<String>,
    /// Case-insensitive substring of the vendor name
    pub vendor_contains: Option<String>,
    /// Case-sensitive substring of the PO id
    pub po_contains: Option<String>,
}

impl LedgerFilter {
    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if record.priority != *priority {
                return false;
            }
        }
        if let Some(vendor) = &self.vendor_contains {
            if !record
                .vendor_name
                .to_lowercase()
                .contains(&vendor.to_lowercase())
            {
                return false;
            }
        }
        if let Some(po) = &self.po_contains {
            if !record.po_id.contains(po.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[OrderRecord]) -> Vec<OrderRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
