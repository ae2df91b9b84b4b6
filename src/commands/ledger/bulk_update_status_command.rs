use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::{bulk_set_status, parse_status},
    models::{OrderRecord, RecordKey},
};

/// Applies one status to every selected record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateStatusCommand {
    pub keys: BTreeSet<RecordKey>,
    pub status: String,
}

impl Command for BulkUpdateStatusCommand {
    /// Number of records touched.
    type Result = usize;

    #[instrument(skip(self, _ctx, ledger), fields(selected = self.keys.len(), status = %self.status))]
    fn execute(
        &self,
        _ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        if self.keys.is_empty() {
            return Err(ServiceError::EmptySelection);
        }
        let status = parse_status(&self.status)?;
        let records = bulk_set_status(ledger, &self.keys, status)?;
        let touched = records
            .iter()
            .filter(|r| self.keys.iter().any(|k| k.matches(r)))
            .count();

        info!(touched, status = %status, "Bulk status update applied");
        Ok(CommandOutcome::new(records, touched))
    }
}
