use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::{
    commands::{
        ledger::{
            BulkUpdateStatusCommand, CreateRequestCommand, OpenPurchaseOrderCommand,
            OpenPurchaseRequisitionCommand, ReceiveLineCommand, ReceivePurchaseOrderCommand,
            UpdateStatusCommand,
        },
        Command, CommandContext,
    },
    config::TrackerConfig,
    errors::ServiceError,
    lifecycle::{search, ReceiveQuantity},
    models::{
        CatalogItem, OrderRecord, RecordKey, Stage, Status, Table, CATALOG_DESCRIPTION_COLUMN,
        LEDGER_COLUMNS,
    },
    services::dashboard::{lead_times, summarize, DashboardSummary, LeadTime, LedgerFilter},
    store::{StoreError, TabularStore},
};

/// Column of the enum table listing priority options.
pub const PRIORITY_COLUMN: &str = "Priority";

/// Input for a new purchase request, before the catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub item_no: String,
    pub quantity: Decimal,
    /// Falls back to the first priority option when absent
    pub priority: Option<String>,
    pub back_order: Option<String>,
    pub request_date: NaiveDate,
}

/// Service for tracking requests, requisitions and purchase order lines
///
/// Every mutating call loads the whole ledger, runs one command against it and
/// saves the whole ledger back. Concurrent writers are not coordinated.
pub struct LedgerService<S> {
    store: S,
    config: TrackerConfig,
}

impl<S: TabularStore> LedgerService<S> {
    /// Creates a new ledger service over `store`
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads every ledger record; a ledger that was never saved is empty
    #[instrument(skip(self))]
    pub fn load_ledger(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        match self.load_ledger_table()? {
            Some(table) => table.to_records(),
            None => Ok(Vec::new()),
        }
    }

    fn load_ledger_table(&self) -> Result<Option<Table>, ServiceError> {
        match self.store.load(&self.config.ledger_table) {
            Ok(table) => Ok(Some(table)),
            Err(StoreError::TableNotFound(name)) => {
                info!("Ledger table '{}' not found; starting empty", name);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to load ledger: {}", e);
                Err(e.into())
            }
        }
    }

    /// Replaces the stored ledger with `records`, keeping the stored column order
    #[instrument(skip(self, records), fields(rows = records.len()))]
    pub fn save_ledger(&self, records: &[OrderRecord]) -> Result<(), ServiceError> {
        let current = self.load_ledger_table()?;
        self.write_ledger(current.as_ref(), records)
    }

    fn write_ledger(
        &self,
        current: Option<&Table>,
        records: &[OrderRecord],
    ) -> Result<(), ServiceError> {
        let layout = current.map(Table::columns).unwrap_or_default();
        let table = Table::from_records_in_layout(LEDGER_COLUMNS, layout, records)?;
        self.store
            .save(&self.config.ledger_table, &table)
            .map_err(|e| {
                error!("Failed to save ledger: {}", e);
                ServiceError::from(e)
            })
    }

    /// Runs a command against the current ledger and persists the result
    pub fn execute<C: Command>(&self, command: &C) -> Result<C::Result, ServiceError> {
        let priorities = self.priority_options()?;
        self.execute_with(&priorities, command)
    }

    fn execute_with<C: Command>(
        &self,
        priorities: &[String],
        command: &C,
    ) -> Result<C::Result, ServiceError> {
        let current = self.load_ledger_table()?;
        let records = match &current {
            Some(table) => table.to_records()?,
            None => Vec::new(),
        };
        let ctx = CommandContext::new(&self.config).with_priorities(priorities);
        let outcome = command.execute(&ctx, &records)?;
        self.write_ledger(current.as_ref(), &outcome.records)?;
        Ok(outcome.result)
    }

    #[instrument(skip(self))]
    pub fn load_catalog(&self) -> Result<Table, ServiceError> {
        self.store.load(&self.config.catalog_table).map_err(|e| {
            error!("Failed to load catalog: {}", e);
            ServiceError::from(e)
        })
    }

    /// Catalog items whose description matches `query`, capped at the configured limit
    #[instrument(skip(self))]
    pub fn search_catalog(&self, query: &str) -> Result<Vec<CatalogItem>, ServiceError> {
        self.search_catalog_columns(query, &[CATALOG_DESCRIPTION_COLUMN])
    }

    /// Like [`search_catalog`](Self::search_catalog) over explicit columns
    pub fn search_catalog_columns(
        &self,
        query: &str,
        columns: &[&str],
    ) -> Result<Vec<CatalogItem>, ServiceError> {
        let catalog = self.load_catalog()?;
        let results = search(&catalog, query, columns, Some(self.config.search_limit))?;
        let items = results.items().collect();
        Ok(items)
    }

    /// Looks up one catalog item by item number
    pub fn find_catalog_item(&self, item_no: &str) -> Result<CatalogItem, ServiceError> {
        let item_no = item_no.trim();
        let catalog = self.load_catalog()?;
        let found = catalog
            .rows()
            .filter_map(|row| CatalogItem::from_row(&row))
            .find(|item| item.item_no == item_no);
        found.ok_or_else(|| ServiceError::UnknownRecordKey(format!("item {}", item_no)))
    }

    /// Priority options from the enum table, or the configured defaults
    pub fn priority_options(&self) -> Result<Vec<String>, ServiceError> {
        let table = match self.store.load(&self.config.enum_table) {
            Ok(table) => table,
            Err(StoreError::TableNotFound(_)) => return Ok(self.config.priorities.clone()),
            Err(e) => return Err(e.into()),
        };

        if table.column_index(PRIORITY_COLUMN).is_none() {
            warn!(
                "Enum table '{}' has no {} column; using configured priorities",
                self.config.enum_table, PRIORITY_COLUMN
            );
            return Ok(self.config.priorities.clone());
        }

        let options = table.distinct_values(PRIORITY_COLUMN);
        if options.is_empty() {
            Ok(self.config.priorities.clone())
        } else {
            Ok(options)
        }
    }

    /// Records a new purchase request and returns its id
    #[instrument(skip(self, request), fields(item_no = %request.item_no))]
    pub fn create_request(&self, request: NewRequest) -> Result<String, ServiceError> {
        let item = self.find_catalog_item(&request.item_no)?;
        let options = self.priority_options()?;

        let priority = match request.priority {
            Some(priority) => priority,
            None => options.first().cloned().unwrap_or_default(),
        };

        let command = CreateRequestCommand {
            item_no: item.item_no,
            description: item.description,
            quantity: request.quantity,
            priority,
            back_order: request.back_order,
            request_date: request.request_date,
        };
        Ok(self.execute_with(&options, &command)?.request_id)
    }

    #[instrument(skip(self))]
    pub fn update_status(&self, key: RecordKey, status: &str) -> Result<Status, ServiceError> {
        self.execute(&UpdateStatusCommand {
            key,
            status: status.to_string(),
        })
    }

    #[instrument(skip(self, keys), fields(selected = keys.len()))]
    pub fn bulk_update_status(
        &self,
        keys: BTreeSet<RecordKey>,
        status: &str,
    ) -> Result<usize, ServiceError> {
        self.execute(&BulkUpdateStatusCommand {
            keys,
            status: status.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn open_purchase_requisition(&self, request_id: &str) -> Result<String, ServiceError> {
        self.execute(&OpenPurchaseRequisitionCommand {
            request_id: request_id.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn open_purchase_order(
        &self,
        request_ids: Vec<String>,
        vendor_no: &str,
        vendor_name: &str,
    ) -> Result<String, ServiceError> {
        self.execute(&OpenPurchaseOrderCommand {
            request_ids,
            vendor_no: vendor_no.to_string(),
            vendor_name: vendor_name.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn receive(
        &self,
        key: RecordKey,
        quantity: ReceiveQuantity,
    ) -> Result<OrderRecord, ServiceError> {
        self.execute(&ReceiveLineCommand { key, quantity })
    }

    #[instrument(skip(self))]
    pub fn receive_purchase_order(&self, po_id: &str) -> Result<usize, ServiceError> {
        self.execute(&ReceivePurchaseOrderCommand {
            po_id: po_id.to_string(),
        })
    }

    pub fn records_in_stage(&self, stage: Stage) -> Result<Vec<OrderRecord>, ServiceError> {
        Ok(self
            .load_ledger()?
            .into_iter()
            .filter(|r| r.stage() == stage)
            .collect())
    }

    pub fn filter(&self, filter: &LedgerFilter) -> Result<Vec<OrderRecord>, ServiceError> {
        Ok(filter.apply(&self.load_ledger()?))
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        Ok(summarize(&self.load_ledger()?))
    }

    pub fn lead_times(&self, today: NaiveDate) -> Result<Vec<LeadTime>, ServiceError> {
        Ok(lead_times(&self.load_ledger()?, today))
    }
}
