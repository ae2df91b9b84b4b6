use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transitions::{resolve_status, StatusEvent};
use crate::errors::ServiceError;
use crate::models::{OrderRecord, RecordKey, QUANTITY_COLUMN, QUANTITY_RECEIVED_COLUMN};

/// How a receipt is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "quantity", rename_all = "snake_case")]
pub enum ReceiveQuantity {
    /// Add to whatever has been received so far.
    Delta(Decimal),
    /// Replace the received total, for corrections.
    Absolute(Decimal),
}

/// Applies a receipt to a single record and returns the updated copy.
pub fn receive(record: &OrderRecord, quantity: ReceiveQuantity) -> Result<OrderRecord, ServiceError> {
    ordered_quantity(record)?;

    let received = match quantity {
        ReceiveQuantity::Delta(delta) => {
            if delta < Decimal::ZERO {
                return Err(ServiceError::InvalidQuantity(format!(
                    "received delta must not be negative, got {}",
                    delta
                )));
            }
            if let Some(raw) = record.unparsed_cell(QUANTITY_RECEIVED_COLUMN) {
                return Err(ServiceError::InvalidQuantity(format!(
                    "received quantity for {} is not a number ('{}')",
                    record.request_id, raw
                )));
            }
            record.received() + delta
        }
        ReceiveQuantity::Absolute(total) => total,
    };

    if received < Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "received quantity for {} would be {}",
            record.request_id, received
        )));
    }

    let mut updated = record.clone();
    updated.quantity_received = Some(received);
    updated.refresh_outstanding();
    updated.status = resolve_status(&updated, StatusEvent::Received)?;
    Ok(updated)
}

/// Applies a receipt to the one record addressed by `key`.
pub fn receive_line(
    records: &[OrderRecord],
    key: &RecordKey,
    quantity: ReceiveQuantity,
) -> Result<Vec<OrderRecord>, ServiceError> {
    let index = single_match(records, key)?;
    let mut updated = records.to_vec();
    updated[index] = receive(&records[index], quantity)?;
    debug!(%key, received = %updated[index].received(), "Line received");
    Ok(updated)
}

/// Marks every line of `po_id` as received in full.
pub fn receive_in_full(records: &[OrderRecord], po_id: &str) -> Result<Vec<OrderRecord>, ServiceError> {
    let po_id = po_id.trim();
    let mut touched = 0usize;
    let mut updated = records.to_vec();

    for record in updated.iter_mut().filter(|r| !po_id.is_empty() && r.po_id == po_id) {
        let ordered = ordered_quantity(record)?;
        record.quantity_received = Some(ordered);
        record.refresh_outstanding();
        record.status = resolve_status(record, StatusEvent::ReceivedInFull)?;
        touched += 1;
    }

    if touched == 0 {
        return Err(ServiceError::UnknownRecordKey(format!("PO {}", po_id)));
    }
    debug!(po_id, lines = touched, "Purchase order received in full");
    Ok(updated)
}

fn ordered_quantity(record: &OrderRecord) -> Result<Decimal, ServiceError> {
    match record.quantity {
        Some(q) if q >= Decimal::ZERO => Ok(q),
        Some(q) => Err(ServiceError::InvalidQuantity(format!(
            "ordered quantity for {} is negative ({})",
            record.request_id, q
        ))),
        None => match record.unparsed_cell(QUANTITY_COLUMN) {
            Some(raw) => Err(ServiceError::InvalidQuantity(format!(
                "ordered quantity for {} is not a number ('{}')",
                record.request_id, raw
            ))),
            None => Err(ServiceError::InvalidQuantity(format!(
                "ordered quantity for {} is missing",
                record.request_id
            ))),
        },
    }
}

pub(crate) fn single_match(records: &[OrderRecord], key: &RecordKey) -> Result<usize, ServiceError> {
    let mut matches = records
        .iter()
        .enumerate()
        .filter(|(_, r)| key.matches(r))
        .map(|(i, _)| i);
    let first = matches
        .next()
        .ok_or_else(|| ServiceError::UnknownRecordKey(key.to_string()))?;
    if matches.next().is_some() {
        return Err(ServiceError::ValidationError(format!(
            "{} matches more than one record",
            key
        )));
    }
    Ok(first)
}
