use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ids::next_id;
use super::reconcile::single_match;
use super::transitions::{resolve_status, StatusEvent};
use crate::errors::ServiceError;
use crate::models::{OrderRecord, RecordKey, Stage, Status};

/// Vendor details captured when a purchase order is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_no: String,
    pub vendor_name: String,
}

/// Promotes a bare request to a purchase requisition.
///
/// Returns the updated ledger and the new PR id.
pub fn open_purchase_requisition(
    records: &[OrderRecord],
    request_id: &str,
    pr_prefix: &str,
) -> Result<(Vec<OrderRecord>, String), ServiceError> {
    let index = single_match(records, &RecordKey::request(request_id))?;
    require_stage(&records[index], Stage::Request)?;

    let pr_id = next_id(records.iter().map(|r| r.pr_id.as_str()), pr_prefix);
    let mut updated = records.to_vec();
    let record = &mut updated[index];
    record.pr_id = pr_id.clone();
    record.status = resolve_status(record, StatusEvent::Set(Status::PrOpened))?;

    debug!(request_id, %pr_id, "Purchase requisition opened");
    Ok((updated, pr_id))
}

/// Opens one purchase order covering every listed PR line.
///
/// Returns the updated ledger and the new PO id.
pub fn open_purchase_order(
    records: &[OrderRecord],
    request_ids: &[String],
    po_prefix: &str,
    vendor: &Vendor,
) -> Result<(Vec<OrderRecord>, String), ServiceError> {
    if request_ids.is_empty() {
        return Err(ServiceError::EmptySelection);
    }

    let mut indices = Vec::with_capacity(request_ids.len());
    for request_id in request_ids {
        let index = single_match(records, &RecordKey::request(request_id.as_str()))?;
        require_stage(&records[index], Stage::PurchaseRequisition)?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }

    let po_id = next_id(records.iter().map(|r| r.po_id.as_str()), po_prefix);
    let mut updated = records.to_vec();
    for index in indices {
        let record = &mut updated[index];
        record.po_id = po_id.clone();
        record.vendor_no = vendor.vendor_no.clone();
        record.vendor_name = vendor.vendor_name.clone();
        record.status = resolve_status(record, StatusEvent::Set(Status::PoDrafted))?;
    }

    debug!(%po_id, lines = request_ids.len(), "Purchase order opened");
    Ok((updated, po_id))
}

fn require_stage(record: &OrderRecord, expected: Stage) -> Result<(), ServiceError> {
    let stage = record.stage();
    if stage == expected {
        return Ok(());
    }
    // Reported as the status the promotion would have set.
    let target = match expected {
        Stage::Request => Status::PrOpened,
        Stage::PurchaseRequisition => Status::PoDrafted,
        Stage::PurchaseOrder => Status::Received,
    };
    Err(ServiceError::InvalidStatusForStage { status: target, stage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bare(request_id: &str) -> OrderRecord {
        OrderRecord {
            request_id: request_id.into(),
            item_no: format!("IT-{}", request_id),
            ..Default::default()
        }
    }

    #[test]
    fn requisition_gets_next_pr_id() {
        let mut existing = bare("REQ-0001");
        existing.pr_id = "PR-0004".into();
        existing.status = Status::PendingHeadApproval;
        let records = vec![existing, bare("REQ-0002")];

        let (updated, pr_id) = open_purchase_requisition(&records, "REQ-0002", "PR-").unwrap();
        assert_eq!(pr_id, "PR-0005");
        assert_eq!(updated[1].pr_id, "PR-0005");
        assert_eq!(updated[1].status, Status::PrOpened);
        assert_eq!(updated[1].stage(), Stage::PurchaseRequisition);
    }

    #[test]
    fn requisition_requires_bare_request() {
        let mut record = bare("REQ-0001");
        record.pr_id = "PR-0001".into();
        assert_matches!(
            open_purchase_requisition(&[record], "REQ-0001", "PR-"),
            Err(ServiceError::InvalidStatusForStage { .. })
        );
    }

    #[test]
    fn purchase_order_groups_lines() {
        let mut a = bare("REQ-0001");
        a.pr_id = "PR-0001".into();
        let mut b = bare("REQ-0002");
        b.pr_id = "PR-0001".into();
        let records = vec![a, b, bare("REQ-0003")];
        let vendor = Vendor {
            vendor_no: "V-10".into(),
            vendor_name: "Optics Co".into(),
        };

        let (updated, po_id) = open_purchase_order(
            &records,
            &["REQ-0001".to_string(), "REQ-0002".to_string()],
            "PO-",
            &vendor,
        )
        .unwrap();

        assert_eq!(po_id, "PO-0001");
        for line in &updated[..2] {
            assert_eq!(line.po_id, "PO-0001");
            assert_eq!(line.vendor_name, "Optics Co");
            assert_eq!(line.status, Status::PoDrafted);
            assert!(line.is_po_line());
        }
        assert!(updated[2].is_bare_request());
    }

    #[test]
    fn lines_with_receipts_open_as_received() {
        use rust_decimal_macros::dec;

        let mut early = bare("REQ-0001");
        early.pr_id = "PR-0001".into();
        early.quantity = Some(dec!(4));
        early.quantity_received = Some(dec!(1));
        let mut pending = bare("REQ-0002");
        pending.pr_id = "PR-0002".into();
        let records = vec![early, pending];

        let (updated, _) = open_purchase_order(
            &records,
            &["REQ-0001".to_string(), "REQ-0002".to_string()],
            "PO-",
            &Vendor::default(),
        )
        .unwrap();
        assert_eq!(updated[0].status, Status::Received);
        assert_eq!(updated[1].status, Status::PoDrafted);
    }

    #[test]
    fn purchase_order_rejects_bare_requests_and_empty_lists() {
        let records = vec![bare("REQ-0001")];
        assert_matches!(
            open_purchase_order(&records, &["REQ-0001".to_string()], "PO-", &Vendor::default()),
            Err(ServiceError::InvalidStatusForStage { stage: Stage::Request, .. })
        );
        assert_matches!(
            open_purchase_order(&records, &[], "PO-", &Vendor::default()),
            Err(ServiceError::EmptySelection)
        );
    }
}
