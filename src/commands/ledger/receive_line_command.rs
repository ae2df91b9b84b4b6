use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::{receive_line, ReceiveQuantity},
    models::{OrderRecord, RecordKey},
};

/// Records goods received against one ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveLineCommand {
    pub key: RecordKey,
    pub quantity: ReceiveQuantity,
}

impl Command for ReceiveLineCommand {
    /// The row after the receipt.
    type Result = OrderRecord;

    #[instrument(skip(self, _ctx, ledger), fields(key = %self.key))]
    fn execute(
        &self,
        _ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        let records = receive_line(ledger, &self.key, self.quantity)?;
        let updated = records
            .iter()
            .find(|r| self.key.matches(r))
            .cloned()
            .ok_or_else(|| ServiceError::UnknownRecordKey(self.key.to_string()))?;

        info!(
            key = %self.key,
            received = %updated.received(),
            status = %updated.status,
            "Receipt recorded"
        );
        Ok(CommandOutcome::new(records, updated))
    }
}
