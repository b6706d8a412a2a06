use super::WarehouseLedger;
use crate::{
    auth::AdminSession,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{feed::FeedDraft, Feed, FeedPatch, NewFeed, WarehouseStockEntry},
    store::{Collection, DocumentStore, DocumentStoreExt},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFeedOutcome {
    pub feed: Feed,
    /// Ledger entry created for a non-zero opening quantity
    pub stock_entry: Option<WarehouseStockEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFeedOutcome {
    pub feed_id: Uuid,
    pub ledger_entries_removed: usize,
}

/// Feed catalog. Reads are open; every mutation requires an [`AdminSession`].
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    ledger: WarehouseLedger,
    event_sender: EventSender,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        ledger: WarehouseLedger,
        event_sender: EventSender,
    ) -> Self {
        Self {
            store,
            ledger,
            event_sender,
        }
    }

    pub async fn list_feeds(&self) -> Result<Vec<Feed>, ServiceError> {
        Ok(self.store.list_as(Collection::Feeds).await?)
    }

    pub async fn get_feed(&self, feed_id: Uuid) -> Result<Feed, ServiceError> {
        self.list_feeds()
            .await?
            .into_iter()
            .find(|feed| feed.id == feed_id)
            .ok_or_else(|| ServiceError::NotFound(format!("feed {}", feed_id)))
    }

    /// Creates a feed and, for a positive opening quantity, its ledger entry.
    /// The two writes are independent.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub async fn add_feed(
        &self,
        session: &AdminSession,
        new_feed: NewFeed,
    ) -> Result<AddFeedOutcome, ServiceError> {
        new_feed.validate()?;

        let feed: Feed = self
            .store
            .create_as(
                Collection::Feeds,
                &FeedDraft {
                    name: new_feed.name.trim(),
                    category: new_feed.category,
                    price: new_feed.price,
                },
            )
            .await?;
        info!(feed_id = %feed.id, name = %feed.name, "feed added");
        self.event_sender.publish(Event::FeedCreated(feed.id));

        let stock_entry = match new_feed.initial_quantity {
            Some(quantity) if quantity > 0 => Some(self.ledger.increase(feed.id, quantity).await?),
            _ => None,
        };

        Ok(AddFeedOutcome { feed, stock_entry })
    }

    /// Applies only the fields present in `patch`
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub async fn edit_feed(
        &self,
        session: &AdminSession,
        feed_id: Uuid,
        mut patch: FeedPatch,
    ) -> Result<Feed, ServiceError> {
        patch.validate()?;
        let current = self.get_feed(feed_id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        if let Some(name) = patch.name.as_mut() {
            *name = name.trim().to_string();
        }

        let feed: Feed = self
            .store
            .update_as(Collection::Feeds, feed_id, &patch)
            .await?;
        info!(feed_id = %feed.id, "feed updated");
        self.event_sender.publish(Event::FeedUpdated(feed.id));
        Ok(feed)
    }

    /// Deletes a feed together with its warehouse ledger entries
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub async fn delete_feed(
        &self,
        session: &AdminSession,
        feed_id: Uuid,
    ) -> Result<DeleteFeedOutcome, ServiceError> {
        self.get_feed(feed_id).await?;
        self.store.delete(Collection::Feeds, feed_id).await?;
        let ledger_entries_removed = self.ledger.remove_feed(feed_id).await?;

        info!(feed_id = %feed_id, ledger_entries_removed, "feed deleted");
        self.event_sender.publish(Event::FeedDeleted {
            feed_id,
            ledger_entries_removed,
        });
        Ok(DeleteFeedOutcome {
            feed_id,
            ledger_entries_removed,
        })
    }
}
