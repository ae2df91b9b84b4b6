// Ledger orchestration over a tabular store
pub mod ledger;

// Read-only summaries and filters
pub mod dashboard;

pub use dashboard::{lead_days, lead_times, summarize, DashboardSummary, LeadTime, LedgerFilter};
pub use ledger::{LedgerService, NewRequest, PRIORITY_COLUMN};
