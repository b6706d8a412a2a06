pub mod audit;
pub mod catalog;
pub mod ledger;
pub mod movements;
pub mod transfers;

pub use audit::AuditLog;
pub use catalog::{AddFeedOutcome, CatalogService, DeleteFeedOutcome};
pub use ledger::WarehouseLedger;
pub use movements::{MovementOutcome, SkippedLine, TruckMovementService};
pub use transfers::{DirectTransferService, RegisterLoadOutcome, TransferOutcome};

use crate::errors::ServiceError;
use crate::models::StockLine;

/// Trims a truck number, rejecting blank input.
pub(crate) fn require_truck_number(raw: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "{} is required",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Item lists must be non-empty and every line must move at least one bag.
pub(crate) fn validate_items(items: &[StockLine]) -> Result<(), ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::ValidationError(
            "at least one item is required".to_string(),
        ));
    }
    if let Some(line) = items.iter().find(|line| line.quantity == 0) {
        return Err(ServiceError::ValidationError(format!(
            "quantity for feed {} must be greater than zero",
            line.feed_id
        )));
    }
    Ok(())
}
