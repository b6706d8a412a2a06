use super::{require_truck_number, validate_items, AuditLog, WarehouseLedger};
use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        parse_destinations, truck::TruckMovementDraft, LogEntry, LogPayload, MovementType,
        StockLine, TruckEntryDetails, TruckMovement, WarehouseStockEntry,
    },
    store::{Collection, DocumentStore, DocumentStoreExt},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// An outgoing line the warehouse could not cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLine {
    pub feed_id: Uuid,
    pub requested: u32,
    pub available: u32,
}

/// Everything a recorded movement changed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementOutcome {
    pub movement: TruckMovement,
    /// Ledger entries after each applied line, in item order
    pub applied: Vec<WarehouseStockEntry>,
    /// Outgoing lines left unapplied for lack of stock
    pub skipped: Vec<SkippedLine>,
    pub log_entry: LogEntry,
}

/// Records truck arrivals and departures against the warehouse ledger.
#[derive(Clone)]
pub struct TruckMovementService {
    store: Arc<dyn DocumentStore>,
    ledger: WarehouseLedger,
    audit: AuditLog,
    event_sender: EventSender,
}

impl TruckMovementService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        ledger: WarehouseLedger,
        audit: AuditLog,
        event_sender: EventSender,
    ) -> Self {
        Self {
            store,
            ledger,
            audit,
            event_sender,
        }
    }

    pub async fn movements(&self) -> Result<Vec<TruckMovement>, ServiceError> {
        Ok(self.store.list_as(Collection::Trucks).await?)
    }

    // Repeated feeds count cumulatively.
    async fn check_incoming_capacity(&self, items: &[StockLine]) -> Result<(), ServiceError> {
        let mut totals: Vec<(Uuid, u64)> = Vec::new();
        for line in items {
            match totals.iter_mut().find(|(feed_id, _)| *feed_id == line.feed_id) {
                Some((_, total)) => *total += u64::from(line.quantity),
                None => totals.push((line.feed_id, u64::from(line.quantity))),
            }
        }
        for (feed_id, total) in totals {
            self.ledger.ensure_room_for(feed_id, total).await?;
        }
        Ok(())
    }

    /// Persists the movement, then applies each line to the ledger in order.
    ///
    /// Lines are applied independently. An outgoing line the warehouse cannot
    /// cover is skipped and reported; the movement record still lists every
    /// requested line. Incoming lines that would overflow a counter reject the
    /// whole movement before anything is written. A store failure stops
    /// processing and leaves earlier writes in place.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn record_movement(
        &self,
        truck_number: &str,
        movement_type: MovementType,
        destinations: &str,
        items: Vec<StockLine>,
    ) -> Result<MovementOutcome, ServiceError> {
        let truck_number = require_truck_number(truck_number, "truckNumber")?;
        validate_items(&items)?;
        let destinations = parse_destinations(destinations);
        if movement_type == MovementType::Incoming {
            self.check_incoming_capacity(&items).await?;
        }

        let movement: TruckMovement = self
            .store
            .create_as(
                Collection::Trucks,
                &TruckMovementDraft {
                    truck_number: &truck_number,
                    movement_type,
                    destinations: &destinations,
                    items: &items,
                },
            )
            .await?;

        let mut applied = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();
        for line in &items {
            let result = match movement_type {
                MovementType::Incoming => self.ledger.increase(line.feed_id, line.quantity).await,
                MovementType::Outgoing => self.ledger.decrease(line.feed_id, line.quantity).await,
            };
            match result {
                Ok(entry) => applied.push(entry),
                Err(ServiceError::InsufficientStock {
                    feed_id,
                    requested,
                    available,
                }) => {
                    warn!(
                        truck_number = %truck_number,
                        feed_id = %feed_id,
                        requested,
                        available,
                        "skipping outgoing line: insufficient warehouse stock"
                    );
                    skipped.push(SkippedLine {
                        feed_id,
                        requested,
                        available,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let log_entry = self
            .audit
            .append(LogPayload::TruckEntry(TruckEntryDetails {
                movement_id: movement.id,
                truck_number: movement.truck_number.clone(),
                movement_type,
                destinations: movement.destinations.clone(),
                items: movement.items.clone(),
            }))
            .await?;

        info!(
            movement_id = %movement.id,
            truck_number = %movement.truck_number,
            movement_type = %movement_type,
            applied = applied.len(),
            skipped = skipped.len(),
            "truck movement recorded"
        );
        self.event_sender.publish(Event::TruckMovementRecorded {
            movement_id: movement.id,
            truck_number: movement.truck_number.clone(),
            movement_type,
            skipped_items: skipped.len(),
        });

        Ok(MovementOutcome {
            movement,
            applied,
            skipped,
            log_entry,
        })
    }
}
