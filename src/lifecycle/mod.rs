//! Order record lifecycle engine.
//!
//! Pure functions over in-memory ledger snapshots: each takes the current
//! records plus parameters and returns a new set of records (or a value),
//! never touching the store.

pub mod bulk;
pub mod ids;
pub mod promotion;
pub mod reconcile;
pub mod search;
pub mod transitions;

pub use bulk::{bulk_set_status, set_status};
pub use ids::{next_id, ID_WIDTH};
pub use promotion::{open_purchase_order, open_purchase_requisition, Vendor};
pub use reconcile::{receive, receive_in_full, receive_line, ReceiveQuantity};
pub use search::{search, Matcher, SearchResults};
pub use transitions::{ensure_status_for_stage, parse_status, resolve_status, StatusEvent};
