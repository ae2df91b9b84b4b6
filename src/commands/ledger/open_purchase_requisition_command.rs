use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::open_purchase_requisition,
    models::OrderRecord,
};

/// Promotes a request to a purchase requisition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenPurchaseRequisitionCommand {
    #[validate(length(min = 1))]
    pub request_id: String,
}

impl Command for OpenPurchaseRequisitionCommand {
    /// The new PR id.
    type Result = String;

    #[instrument(skip(self, ctx, ledger), fields(request_id = %self.request_id))]
    fn execute(
        &self,
        ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        self.validate()?;
        let (records, pr_id) =
            open_purchase_requisition(ledger, &self.request_id, &ctx.config.pr_id_prefix)?;

        info!(request_id = %self.request_id, pr_id = %pr_id, "Purchase requisition opened");
        Ok(CommandOutcome::new(records, pr_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ledger::test_support::{config, ledger};
    use crate::models::Status;
    use assert_matches::assert_matches;

    #[test]
    fn assigns_next_pr_id() {
        let cmd = OpenPurchaseRequisitionCommand {
            request_id: "REQ-0001".into(),
        };
        let outcome = cmd.execute(&CommandContext::new(&config()), &ledger()).unwrap();
        assert_eq!(outcome.result, "PR-0002");
        assert_eq!(outcome.records[0].pr_id, "PR-0002");
        assert_eq!(outcome.records[0].status, Status::PrOpened);
    }

    #[test]
    fn already_promoted_request_is_rejected() {
        let cmd = OpenPurchaseRequisitionCommand {
            request_id: "REQ-0002".into(),
        };
        assert_matches!(
            cmd.execute(&CommandContext::new(&config()), &ledger()),
            Err(ServiceError::InvalidStatusForStage { .. })
        );
    }
}
