pub mod bulk_update_status_command;
pub mod create_request_command;
pub mod open_purchase_order_command;
pub mod open_purchase_requisition_command;
pub mod receive_line_command;
pub mod receive_purchase_order_command;
pub mod update_status_command;

pub use bulk_update_status_command::BulkUpdateStatusCommand;
pub use create_request_command::{CreateRequestCommand, CreateRequestResult};
pub use open_purchase_order_command::OpenPurchaseOrderCommand;
pub use open_purchase_requisition_command::OpenPurchaseRequisitionCommand;
pub use receive_line_command::ReceiveLineCommand;
pub use receive_purchase_order_command::ReceivePurchaseOrderCommand;
pub use update_status_command::UpdateStatusCommand;
