use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::{open_purchase_order, Vendor},
    models::OrderRecord,
};

/// Groups purchase requisition lines under one new purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenPurchaseOrderCommand {
    pub request_ids: Vec<String>,
    #[validate(length(min = 1))]
    pub vendor_no: String,
    #[validate(length(min = 1))]
    pub vendor_name: String,
}

impl Command for OpenPurchaseOrderCommand {
    /// The new PO id.
    type Result = String;

    #[instrument(skip(self, ctx, ledger), fields(lines = self.request_ids.len(), vendor_no = %self.vendor_no))]
    fn execute(
        &self,
        ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        if self.request_ids.is_empty() {
            return Err(ServiceError::EmptySelection);
        }
        self.validate()?;

        let vendor = Vendor {
            vendor_no: self.vendor_no.trim().to_string(),
            vendor_name: self.vendor_name.trim().to_string(),
        };
        let (records, po_id) =
            open_purchase_order(ledger, &self.request_ids, &ctx.config.po_id_prefix, &vendor)?;

        info!(
            po_id = %po_id,
            lines = self.request_ids.len(),
            vendor = %vendor.vendor_name,
            "Purchase order drafted"
        );
        Ok(CommandOutcome::new(records, po_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ledger::test_support::{config, ledger};
    use crate::models::Status;
    use assert_matches::assert_matches;

    fn command(request_ids: &[&str]) -> OpenPurchaseOrderCommand {
        OpenPurchaseOrderCommand {
            request_ids: request_ids.iter().map(|s| s.to_string()).collect(),
            vendor_no: "V-7".into(),
            vendor_name: "Lens House".into(),
        }
    }

    #[test]
    fn drafts_po_for_requisition_lines() {
        let outcome = command(&["REQ-0002"]).execute(&CommandContext::new(&config()), &ledger()).unwrap();
        assert_eq!(outcome.result, "PO-0002");
        let line = &outcome.records[1];
        assert_eq!(line.po_id, "PO-0002");
        assert_eq!(line.vendor_name, "Lens House");
        assert_eq!(line.status, Status::PoDrafted);
    }

    #[test]
    fn empty_selection_wins_over_validation() {
        let mut cmd = command(&[]);
        cmd.vendor_no.clear();
        assert_matches!(cmd.execute(&CommandContext::new(&config()), &ledger()), Err(ServiceError::EmptySelection));
    }

    #[test]
    fn blank_vendor_is_rejected() {
        let mut cmd = command(&["REQ-0002"]);
        cmd.vendor_name.clear();
        assert_matches!(
            cmd.execute(&CommandContext::new(&config()), &ledger()),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn bare_request_cannot_join_a_po() {
        assert_matches!(
            command(&["REQ-0001"]).execute(&CommandContext::new(&config()), &ledger()),
            Err(ServiceError::InvalidStatusForStage { .. })
        );
    }
}
