use std::collections::BTreeSet;

use tracing::debug;

use super::reconcile::single_match;
use super::transitions::{resolve_status, StatusEvent};
use crate::errors::ServiceError;
use crate::models::{OrderRecord, RecordKey, Status};

/// Sets the status of the single record addressed by `key`.
pub fn set_status(
    records: &[OrderRecord],
    key: &RecordKey,
    status: Status,
) -> Result<Vec<OrderRecord>, ServiceError> {
    let index = single_match(records, key)?;
    let mut updated = records.to_vec();
    updated[index].status = resolve_status(&records[index], StatusEvent::Set(status))?;
    Ok(updated)
}

/// Applies one status to every record whose key is in `selected`.
///
/// All-or-nothing: an empty selection, a key matching no record, or a status
/// foreign to any touched record's stage fails without changing anything.
pub fn bulk_set_status(
    records: &[OrderRecord],
    selected: &BTreeSet<RecordKey>,
    status: Status,
) -> Result<Vec<OrderRecord>, ServiceError> {
    if selected.is_empty() {
        return Err(ServiceError::EmptySelection);
    }

    if let Some(missing) = selected
        .iter()
        .find(|key| !records.iter().any(|r| key.matches(r)))
    {
        return Err(ServiceError::UnknownRecordKey(missing.to_string()));
    }

    let mut updated = records.to_vec();
    let mut touched = 0usize;
    for record in updated
        .iter_mut()
        .filter(|r| selected.iter().any(|key| key.matches(r)))
    {
        record.status = resolve_status(record, StatusEvent::Set(status))?;
        touched += 1;
    }

    debug!(%status, selected = selected.len(), touched, "Bulk status applied");
    Ok(updated)
}
