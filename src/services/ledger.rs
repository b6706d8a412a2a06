use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        stock::{QuantityPatch, StockEntryDraft},
        Feed, StockSummary, WarehouseStockEntry,
    },
    store::{Collection, DocumentStore, DocumentStoreExt},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Warehouse stock ledger: one quantity counter per feed.
#[derive(Clone)]
pub struct WarehouseLedger {
    store: Arc<dyn DocumentStore>,
    event_sender: EventSender,
}

impl WarehouseLedger {
    pub fn new(store: Arc<dyn DocumentStore>, event_sender: EventSender) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    pub async fn entries(&self) -> Result<Vec<WarehouseStockEntry>, ServiceError> {
        Ok(self.store.list_as(Collection::GodownStock).await?)
    }

    /// The ledger entry for a feed. If duplicates exist the first one wins.
    pub async fn entry_for(
        &self,
        feed_id: Uuid,
    ) -> Result<Option<WarehouseStockEntry>, ServiceError> {
        let entries: Vec<WarehouseStockEntry> = self
            .store
            .query_as(Collection::GodownStock, "feedId", &json!(feed_id))
            .await?;
        Ok(entries.into_iter().next())
    }

    /// Fails when adding `additional` bags to the feed's counter would
    /// overflow. Nothing is written.
    pub async fn ensure_room_for(
        &self,
        feed_id: Uuid,
        additional: u64,
    ) -> Result<(), ServiceError> {
        let held = self
            .entry_for(feed_id)
            .await?
            .map(|e| e.quantity)
            .unwrap_or(0);
        if u64::from(held) + additional > u64::from(u32::MAX) {
            return Err(ServiceError::ValidationError(format!(
                "quantity for feed {} would exceed {}",
                feed_id,
                u32::MAX
            )));
        }
        Ok(())
    }

    /// Adds `quantity` bags, creating the entry on first use.
    #[instrument(skip(self))]
    pub async fn increase(
        &self,
        feed_id: Uuid,
        quantity: u32,
    ) -> Result<WarehouseStockEntry, ServiceError> {
        let updated: WarehouseStockEntry = match self.entry_for(feed_id).await? {
            None => {
                self.store
                    .create_as(
                        Collection::GodownStock,
                        &StockEntryDraft { feed_id, quantity },
                    )
                    .await?
            }
            Some(entry) => {
                let new_quantity = entry.quantity.checked_add(quantity).ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "quantity for feed {} would exceed {}",
                        feed_id,
                        u32::MAX
                    ))
                })?;
                self.store
                    .update_as(
                        Collection::GodownStock,
                        entry.id,
                        &QuantityPatch {
                            quantity: new_quantity,
                        },
                    )
                    .await?
            }
        };

        debug!(feed_id = %feed_id, quantity = updated.quantity, "warehouse stock increased");
        self.event_sender.publish(Event::StockIncreased {
            feed_id,
            quantity,
            new_quantity: updated.quantity,
        });
        Ok(updated)
    }

    /// Removes `quantity` bags. Fails without writing when the feed has no
    /// entry or holds fewer bags than requested. Entries that reach zero are kept.
    #[instrument(skip(self))]
    pub async fn decrease(
        &self,
        feed_id: Uuid,
        quantity: u32,
    ) -> Result<WarehouseStockEntry, ServiceError> {
        let entry = self.entry_for(feed_id).await?;
        let available = entry.as_ref().map(|e| e.quantity).unwrap_or(0);

        let entry = match entry {
            Some(entry) if entry.quantity >= quantity => entry,
            _ => {
                self.event_sender.publish(Event::StockShortfall {
                    feed_id,
                    requested: quantity,
                    available,
                });
                return Err(ServiceError::InsufficientStock {
                    feed_id,
                    requested: quantity,
                    available,
                });
            }
        };

        let updated: WarehouseStockEntry = self
            .store
            .update_as(
                Collection::GodownStock,
                entry.id,
                &QuantityPatch {
                    quantity: entry.quantity - quantity,
                },
            )
            .await?;

        debug!(feed_id = %feed_id, quantity = updated.quantity, "warehouse stock decreased");
        self.event_sender.publish(Event::StockDecreased {
            feed_id,
            quantity,
            new_quantity: updated.quantity,
        });
        Ok(updated)
    }

    /// Per-category totals over the current catalog and ledger
    pub async fn summary(&self) -> Result<StockSummary, ServiceError> {
        let feeds: Vec<Feed> = self.store.list_as(Collection::Feeds).await?;
        let entries = self.entries().await?;
        Ok(StockSummary::compute(&feeds, &entries))
    }

    /// Deletes every entry for a feed and returns how many were removed
    #[instrument(skip(self))]
    pub async fn remove_feed(&self, feed_id: Uuid) -> Result<usize, ServiceError> {
        let docs = self
            .store
            .query_by_field(Collection::GodownStock, "feedId", &json!(feed_id))
            .await?;
        for doc in &docs {
            self.store.delete(Collection::GodownStock, doc.id).await?;
        }
        if !docs.is_empty() {
            info!(feed_id = %feed_id, removed = docs.len(), "removed ledger entries");
        }
        Ok(docs.len())
    }
}
