pub mod feed;
pub mod log_entry;
pub mod stock;
pub mod transfer;
pub mod truck;

pub use feed::{Feed, FeedCategory, FeedPatch, NewFeed};
pub use log_entry::{
    DirectTransferDetails, LogAction, LogEntry, LogPayload, TruckEntryDetails, TruckLoadDetails,
};
pub use stock::{CategoryTotal, StockSummary, WarehouseStockEntry};
pub use transfer::DirectTransfer;
pub use truck::{parse_destinations, MovementType, TruckLoad, TruckMovement};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A quantity of one feed, in bags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    pub feed_id: Uuid,
    pub quantity: u32,
}

impl StockLine {
    pub fn new(feed_id: Uuid, quantity: u32) -> Self {
        Self { feed_id, quantity }
    }
}
