use rust_decimal::Decimal;

use crate::errors::ServiceError;
use crate::models::{OrderRecord, Stage, Status};

/// Something that may change a record's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// An explicit status chosen by a user.
    Set(Status),
    /// Goods were received against the record.
    Received,
    /// The whole purchase order was received in full.
    ReceivedInFull,
}

/// Resolves the status a record should carry after `event`.
///
/// This is the only place the receiving override lives. Receiving anything
/// makes a record read `received` whatever stage it is in; an explicit status
/// on a PO line that already has goods received is overridden the same way.
pub fn resolve_status(record: &OrderRecord, event: StatusEvent) -> Result<Status, ServiceError> {
    let has_receipts = record.received() > Decimal::ZERO;
    match event {
        StatusEvent::ReceivedInFull => Ok(Status::Received),
        StatusEvent::Received if has_receipts => Ok(Status::Received),
        StatusEvent::Received => Ok(record.status),
        StatusEvent::Set(status) => {
            ensure_status_for_stage(record.stage(), status)?;
            if has_receipts && record.is_po_line() {
                Ok(Status::Received)
            } else {
                Ok(status)
            }
        }
    }
}

pub fn ensure_status_for_stage(stage: Stage, status: Status) -> Result<(), ServiceError> {
    if stage.allows(status) {
        Ok(())
    } else {
        Err(ServiceError::InvalidStatusForStage { status, stage })
    }
}

/// Parses a user-supplied status label.
pub fn parse_status(label: &str) -> Result<Status, ServiceError> {
    label
        .trim()
        .parse()
        .map_err(|_| ServiceError::UnknownStatus(label.to_string()))
}
