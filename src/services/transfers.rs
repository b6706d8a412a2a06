use super::{require_truck_number, validate_items, AuditLog};
use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        transfer::DirectTransferDraft,
        truck::{StockPatch, TruckLoadDraft},
        DirectTransfer, DirectTransferDetails, LogEntry, LogPayload, StockLine, TruckLoad,
        TruckLoadDetails,
    },
    store::{Collection, DocumentStore, DocumentStoreExt},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLoadOutcome {
    pub load: TruckLoad,
    pub log_entry: LogEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub source: TruckLoad,
    pub destination: TruckLoad,
    pub transfer: DirectTransfer,
    pub log_entry: LogEntry,
}

/// Truck onboard stock and truck-to-truck transfers. These never touch the
/// warehouse ledger.
#[derive(Clone)]
pub struct DirectTransferService {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
    event_sender: EventSender,
}

impl DirectTransferService {
    pub fn new(store: Arc<dyn DocumentStore>, audit: AuditLog, event_sender: EventSender) -> Self {
        Self {
            store,
            audit,
            event_sender,
        }
    }

    pub async fn loads(&self) -> Result<Vec<TruckLoad>, ServiceError> {
        Ok(self.store.list_as(Collection::TruckLoads).await?)
    }

    /// The load registered for a truck number, if any
    pub async fn load_for(&self, truck_number: &str) -> Result<Option<TruckLoad>, ServiceError> {
        let loads: Vec<TruckLoad> = self
            .store
            .query_as(
                Collection::TruckLoads,
                "truckNumber",
                &json!(truck_number.trim()),
            )
            .await?;
        Ok(loads.into_iter().next())
    }

    pub async fn transfers(&self) -> Result<Vec<DirectTransfer>, ServiceError> {
        Ok(self.store.list_as(Collection::DirectTransfers).await?)
    }

    /// Sets a truck's onboard stock, replacing whatever was registered before.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn register_load(
        &self,
        truck_number: &str,
        items: Vec<StockLine>,
    ) -> Result<RegisterLoadOutcome, ServiceError> {
        let truck_number = require_truck_number(truck_number, "truckNumber")?;
        validate_items(&items)?;

        let load: TruckLoad = match self.load_for(&truck_number).await? {
            Some(existing) => {
                self.store
                    .update_as(
                        Collection::TruckLoads,
                        existing.id,
                        &StockPatch { stock: &items },
                    )
                    .await?
            }
            None => {
                self.store
                    .create_as(
                        Collection::TruckLoads,
                        &TruckLoadDraft {
                            truck_number: &truck_number,
                            stock: &items,
                        },
                    )
                    .await?
            }
        };

        let log_entry = self
            .audit
            .append(LogPayload::RegisterTruckLoad(TruckLoadDetails {
                truck_number: load.truck_number.clone(),
                stock: load.stock.clone(),
            }))
            .await?;

        info!(truck_number = %load.truck_number, lines = load.stock.len(), "truck load registered");
        self.event_sender.publish(Event::TruckLoadRegistered {
            truck_number: load.truck_number.clone(),
            lines: load.stock.len(),
        });

        Ok(RegisterLoadOutcome { load, log_entry })
    }

    /// Moves stock from one truck to another.
    ///
    /// Every line is checked against a working copy of the source stock before
    /// anything is written, so lines naming the same feed are checked
    /// cumulatively and a shortfall leaves both trucks untouched. The
    /// destination load is created when the truck has none.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn transfer(
        &self,
        source_truck_number: &str,
        dest_truck_number: &str,
        items: Vec<StockLine>,
    ) -> Result<TransferOutcome, ServiceError> {
        let source_number = require_truck_number(source_truck_number, "sourceTruckNumber")?;
        let dest_number = require_truck_number(dest_truck_number, "destTruckNumber")?;
        validate_items(&items)?;
        if source_number == dest_number {
            return Err(ServiceError::ValidationError(
                "source and destination trucks must differ".to_string(),
            ));
        }

        let source = self
            .load_for(&source_number)
            .await?
            .ok_or_else(|| ServiceError::SourceTruckNotFound(source_number.clone()))?;
        let destination = self.load_for(&dest_number).await?;

        let mut source_stock = source.stock.clone();
        let mut dest_stock = destination
            .as_ref()
            .map(|load| load.stock.clone())
            .unwrap_or_default();

        for item in &items {
            match source_stock
                .iter_mut()
                .find(|line| line.feed_id == item.feed_id)
            {
                Some(line) if line.quantity >= item.quantity => line.quantity -= item.quantity,
                other => {
                    return Err(ServiceError::InsufficientTruckStock {
                        truck_number: source_number,
                        feed_id: item.feed_id,
                        requested: item.quantity,
                        available: other.map(|line| line.quantity).unwrap_or(0),
                    })
                }
            }

            match dest_stock
                .iter_mut()
                .find(|line| line.feed_id == item.feed_id)
            {
                Some(line) => {
                    line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                        ServiceError::ValidationError(format!(
                            "quantity of feed {} on truck {} would exceed {}",
                            item.feed_id,
                            dest_number,
                            u32::MAX
                        ))
                    })?
                }
                None => dest_stock.push(*item),
            }
        }

        let source: TruckLoad = self
            .store
            .update_as(
                Collection::TruckLoads,
                source.id,
                &StockPatch {
                    stock: &source_stock,
                },
            )
            .await?;
        let destination: TruckLoad = match destination {
            Some(existing) => {
                self.store
                    .update_as(
                        Collection::TruckLoads,
                        existing.id,
                        &StockPatch { stock: &dest_stock },
                    )
                    .await?
            }
            None => {
                self.store
                    .create_as(
                        Collection::TruckLoads,
                        &TruckLoadDraft {
                            truck_number: &dest_number,
                            stock: &dest_stock,
                        },
                    )
                    .await?
            }
        };

        let transfer: DirectTransfer = self
            .store
            .create_as(
                Collection::DirectTransfers,
                &DirectTransferDraft {
                    source_truck_number: &source_number,
                    dest_truck_number: &dest_number,
                    items: &items,
                },
            )
            .await?;

        let log_entry = self
            .audit
            .append(LogPayload::DirectTransfer(DirectTransferDetails {
                transfer_id: transfer.id,
                source_truck_number: transfer.source_truck_number.clone(),
                dest_truck_number: transfer.dest_truck_number.clone(),
                items: transfer.items.clone(),
            }))
            .await?;

        info!(
            transfer_id = %transfer.id,
            source = %source_number,
            destination = %dest_number,
            "direct transfer completed"
        );
        self.event_sender.publish(Event::DirectTransferCompleted {
            transfer_id: transfer.id,
            source_truck_number: source_number,
            dest_truck_number: dest_number,
        });

        Ok(TransferOutcome {
            source,
            destination,
            transfer,
            log_entry,
        })
    }
}
