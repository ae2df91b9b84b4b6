use crate::{config::TrackerConfig, errors::ServiceError, models::OrderRecord};

/// Command trait for implementing the Command Pattern
///
/// Each user action is a command object that can be validated and executed
/// against a snapshot of the ledger. Commands never touch the store: they
/// return the new snapshot and the service persists it.
pub trait Command {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command against the current ledger rows
    ///
    /// # Arguments
    /// * `ctx` - Active configuration and the reference data commands check against
    /// * `ledger` - Every record currently in the ledger, in stored order
    ///
    /// # Returns
    /// * The rewritten ledger plus the command's result, or an error with the
    ///   ledger left as it was
    fn execute(
        &self,
        ctx: &CommandContext<'_>,
        ledger: &[OrderRecord],
    ) -> Result<CommandOutcome<Self::Result>, ServiceError>;
}

/// Everything a command may consult besides the ledger itself.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub config: &'a TrackerConfig,
    /// Allowed priority labels, from the enum table or the configured defaults
    pub priorities: &'a [String],
}

impl<'a> CommandContext<'a> {
    /// Context using the configured priorities.
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self {
            config,
            priorities: &config.priorities,
        }
    }

    pub fn with_priorities(mut self, priorities: &'a [String]) -> Self {
        self.priorities = priorities;
        self
    }
}

/// New ledger contents produced by a command, plus its result value.
#[derive(Debug, Clone)]
pub struct CommandOutcome<R> {
    pub records: Vec<OrderRecord>,
    pub result: R,
}

impl<R> CommandOutcome<R> {
    pub fn new(records: Vec<OrderRecord>, result: R) -> Self {
        Self { records, result }
    }
}

pub mod ledger;
