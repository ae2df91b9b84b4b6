use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::receive_in_full,
    models::OrderRecord,
};

/// Marks every line of a purchase order as received in full.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReceivePurchaseOrderCommand {
    #[validate(length(min = 1))]
    pub po_id: String,
}

impl Command for ReceivePurchaseOrderCommand {
    /// Number of lines received.
    type Result = usize;

    #[instrument(skip(self, _ctx, ledger), fields(po_id = %self.po_id))]
    fn execute(
        &self,
        _ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        self.validate()?;
        let records = receive_in_full(ledger, &self.po_id)?;
        let lines = records.iter().filter(|r| r.po_id == self.po_id.trim()).count();

        info!(po_id = %self.po_id, lines, "Purchase order received in full");
        Ok(CommandOutcome::new(records, lines))
    }
}
