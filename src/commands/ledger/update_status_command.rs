use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::{parse_status, set_status},
    models::{OrderRecord, RecordKey, Status},
};

/// Changes the status of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusCommand {
    pub key: RecordKey,
    pub status: String,
}

impl Command for UpdateStatusCommand {
    /// The status the record ended up with, after the receiving override.
    type Result = Status;

    #[instrument(skip(self, _ctx, ledger), fields(key = %self.key, status = %self.status))]
    fn execute(
        &self,
        _ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        let status = parse_status(&self.status)?;
        let records = set_status(ledger, &self.key, status)?;
        let applied = records
            .iter()
            .find(|r| self.key.matches(r))
            .map(|r| r.status)
            .unwrap_or(status);

        info!(key = %self.key, status = %applied, "Record status updated");
        Ok(CommandOutcome::new(records, applied))
    }
}
