use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::MovementType;

/// Domain events published after successful mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    FeedCreated(Uuid),
    FeedUpdated(Uuid),
    FeedDeleted {
        feed_id: Uuid,
        ledger_entries_removed: usize,
    },
    StockIncreased {
        feed_id: Uuid,
        quantity: u32,
        new_quantity: u32,
    },
    StockDecreased {
        feed_id: Uuid,
        quantity: u32,
        new_quantity: u32,
    },
    StockShortfall {
        feed_id: Uuid,
        requested: u32,
        available: u32,
    },
    TruckMovementRecorded {
        movement_id: Uuid,
        truck_number: String,
        movement_type: MovementType,
        skipped_items: usize,
    },
    TruckLoadRegistered {
        truck_number: String,
        lines: usize,
    },
    DirectTransferCompleted {
        transfer_id: Uuid,
        source_truck_number: String,
        dest_truck_number: String,
    },
    AdminSessionOpened {
        session_id: Uuid,
    },
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::FeedCreated(_) => "feed_created",
            Event::FeedUpdated(_) => "feed_updated",
            Event::FeedDeleted { .. } => "feed_deleted",
            Event::StockIncreased { .. } => "stock_increased",
            Event::StockDecreased { .. } => "stock_decreased",
            Event::StockShortfall { .. } => "stock_shortfall",
            Event::TruckMovementRecorded { .. } => "truck_movement_recorded",
            Event::TruckLoadRegistered { .. } => "truck_load_registered",
            Event::DirectTransferCompleted { .. } => "direct_transfer_completed",
            Event::AdminSessionOpened { .. } => "admin_session_opened",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a sender together with its receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Publishes an event without waiting. Events are dropped with a warning
    /// when the channel is full or closed; callers never block on observers.
    pub fn publish(&self, event: Event) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                counter!("godown_events.dropped", 1, "reason" => "full");
                warn!(event = event.name(), "event channel full; dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                counter!("godown_events.dropped", 1, "reason" => "closed");
                debug!(event = event.name(), "event channel closed; dropping event");
            }
        }
    }
}

/// Consumes events until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, low_stock_threshold: u32) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("godown_events.processed", 1, "event" => event.name());
        match &event {
            Event::StockDecreased {
                feed_id,
                new_quantity,
                ..
            } if *new_quantity <= low_stock_threshold => {
                warn!(
                    feed_id = %feed_id,
                    quantity = new_quantity,
                    threshold = low_stock_threshold,
                    "warehouse stock is low"
                );
            }
            Event::StockShortfall {
                feed_id,
                requested,
                available,
            } => {
                warn!(
                    feed_id = %feed_id,
                    requested,
                    available,
                    "outgoing truck requested more than the warehouse holds"
                );
            }
            _ => info!(event = event.name(), details = ?event, "event"),
        }
    }

    info!("Event processing loop stopped");
}
