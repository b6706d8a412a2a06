use super::{Collection, Document, DocumentStore, Fields, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Process-local document store. Documents keep insertion order per collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let doc = Document::new(collection, fields);
        debug!(collection = %collection, id = %doc.id, "creating document");
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let mut guard = self.collections.write().await;
        let doc = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or(StoreError::NotFound { collection, id })?;
        doc.merge(fields);
        Ok(doc.clone())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        let docs = guard
            .get_mut(&collection)
            .ok_or(StoreError::NotFound { collection, id })?;
        let position = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or(StoreError::NotFound { collection, id })?;
        docs.remove(position);
        Ok(())
    }
}
