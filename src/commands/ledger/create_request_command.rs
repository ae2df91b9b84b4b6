use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    commands::{Command, CommandContext, CommandOutcome},
    errors::ServiceError,
    lifecycle::next_id,
    models::{OrderRecord, Status},
};

/// Records a new purchase request for one catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestCommand {
    #[validate(length(min = 1))]
    pub item_no: String,
    pub description: String,
    pub quantity: Decimal,
    #[validate(length(min = 1))]
    pub priority: String,
    pub back_order: Option<String>,
    pub request_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequestResult {
    pub request_id: String,
}

impl Command for CreateRequestCommand {
    type Result = CreateRequestResult;

    #[instrument(skip(self, ctx, ledger), fields(item_no = %self.item_no))]
    fn execute(
        &self,
        ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError> {
        self.validate()?;

        if self.quantity <= Decimal::ZERO {
            return Err(ServiceError::InvalidQuantity(format!(
                "requested quantity must be positive, got {}",
                self.quantity
            )));
        }

        let priority = self.priority.trim();
        if !ctx.priorities.iter().any(|option| option == priority) {
            return Err(ServiceError::ValidationError(format!(
                "priority '{}' is not one of: {}",
                priority,
                ctx.priorities.join(", ")
            )));
        }

        let request_id = next_id(
            ledger.iter().map(|r| r.request_id.as_str()),
            &ctx.config.request_id_prefix,
        );

        let mut record = OrderRecord {
            request_id: request_id.clone(),
            priority: priority.to_string(),
            request_date: Some(self.request_date),
            status: Status::Requested,
            item_no: self.item_no.clone(),
            description: self.description.clone(),
            quantity: Some(self.quantity),
            quantity_received: Some(Decimal::ZERO),
            back_order: self.back_order.clone().unwrap_or_default(),
            ..Default::default()
        };
        record.refresh_outstanding();

        let mut records = ledger.to_vec();
        records.push(record);

        info!(request_id = %request_id, quantity = %self.quantity, "Purchase request created");
        Ok(CommandOutcome::new(records, CreateRequestResult { request_id }))
    }
}
