//! Document store abstraction.
//!
//! All persistence goes through [`DocumentStore`], a narrow collection-oriented
//! interface: list, create, partial update, delete and single-field equality
//! queries. Two implementations ship with the crate: [`InMemoryStore`] for
//! tests and throwaway deployments, and [`SeaOrmStore`] backed by a relational
//! database through sea-orm.

pub mod memory;
pub mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

pub use memory::InMemoryStore;
pub use sql::SeaOrmStore;

/// Field map of a stored document, excluding store-managed metadata.
pub type Fields = Map<String, Value>;

/// Keys owned by the store; callers cannot overwrite them.
const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Logical collections known to the service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Collection {
    #[strum(serialize = "feeds")]
    Feeds,
    #[strum(serialize = "godownStock")]
    GodownStock,
    #[strum(serialize = "trucks")]
    Trucks,
    #[strum(serialize = "truckLoads")]
    TruckLoads,
    #[strum(serialize = "directTransfers")]
    DirectTransfers,
    #[strum(serialize = "logs")]
    Logs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Document {id} not found in {collection}")]
    NotFound { collection: Collection, id: Uuid },

    #[error("Malformed document in {collection}: {reason}")]
    Malformed {
        collection: Collection,
        reason: String,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            // pool exhausted or closed, the backend itself may be fine
            DbErr::ConnectionAcquire(reason) => StoreError::Unavailable(reason.to_string()),
            other => StoreError::Database(other),
        }
    }
}

/// A stored document as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub collection: Collection,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub(crate) fn new(collection: Collection, fields: Fields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            collection,
            fields: strip_reserved(fields),
            created_at: now,
            updated_at: now,
        }
    }

    /// Shallow-merges `patch` into the document and bumps `updated_at`.
    pub(crate) fn merge(&mut self, patch: Fields) {
        for (key, value) in strip_reserved(patch) {
            self.fields.insert(key, value);
        }
        self.updated_at = Utc::now();
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserializes the document, exposing `id`, `createdAt` and `updatedAt`
    /// next to the stored fields.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut map = self.fields.clone();
        map.insert("id".into(), Value::String(self.id.to_string()));
        map.insert(
            "createdAt".into(),
            Value::String(self.created_at.to_rfc3339()),
        );
        map.insert(
            "updatedAt".into(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        serde_json::from_value(Value::Object(map)).map_err(|e| StoreError::Malformed {
            collection: self.collection,
            reason: e.to_string(),
        })
    }

    fn matches(&self, field: &str, value: &Value) -> bool {
        if field == "id" {
            return value.as_str() == Some(self.id.to_string().as_str());
        }
        self.fields.get(field) == Some(value)
    }
}

/// Serializes a value into a field map. Non-object values are rejected.
pub fn encode<T: Serialize>(collection: Collection, value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(strip_reserved(map)),
        Ok(other) => Err(StoreError::Malformed {
            collection,
            reason: format!("expected an object, got {}", other),
        }),
        Err(e) => Err(StoreError::Malformed {
            collection,
            reason: e.to_string(),
        }),
    }
}

fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_KEYS {
        fields.remove(key);
    }
    fields
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection, in insertion order.
    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    async fn create(&self, collection: Collection, fields: Fields)
        -> Result<Document, StoreError>;

    /// Shallow-merges `fields` into an existing document.
    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError>;

    /// Documents whose top-level `field` equals `value`, in insertion order.
    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.list_all(collection).await?;
        Ok(docs
            .into_iter()
            .filter(|doc| doc.matches(field, value))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Typed helpers layered over any [`DocumentStore`].
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    async fn list_as<T>(&self, collection: Collection) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        self.list_all(collection)
            .await?
            .iter()
            .map(Document::decode)
            .collect()
    }

    async fn query_as<T>(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        self.query_by_field(collection, field, value)
            .await?
            .iter()
            .map(Document::decode)
            .collect()
    }

    async fn create_as<T, D>(&self, collection: Collection, draft: &D) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Send,
        D: Serialize + Sync,
    {
        let fields = encode(collection, draft)?;
        self.create(collection, fields).await?.decode()
    }

    async fn update_as<T, P>(
        &self,
        collection: Collection,
        id: Uuid,
        patch: &P,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Send,
        P: Serialize + Sync,
    {
        let fields = encode(collection, patch)?;
        self.update(collection, id, fields).await?.decode()
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::str::FromStr;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct FeedView {
        id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    }

    #[test]
    fn connection_acquire_failures_are_unavailable() {
        let err = StoreError::from(DbErr::ConnectionAcquire(sea_orm::ConnAcquireErr::Timeout));
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = StoreError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn collection_names_round_trip() {
        assert_eq!(Collection::GodownStock.as_str(), "godownStock");
        assert_eq!(Collection::TruckLoads.to_string(), "truckLoads");
        assert_eq!(
            Collection::from_str("directTransfers").unwrap(),
            Collection::DirectTransfers
        );
    }

    #[test]
    fn decode_exposes_store_metadata() {
        let fields = encode(Collection::Feeds, &json!({ "name": "Growfin 2mm" })).unwrap();
        let doc = Document::new(Collection::Feeds, fields);

        let view: FeedView = doc.decode().unwrap();
        assert_eq!(view.id, doc.id);
        assert_eq!(view.name, "Growfin 2mm");
        assert_eq!(view.created_at, doc.created_at);
    }

    #[test]
    fn reserved_keys_are_ignored_on_write() {
        let fields = encode(
            Collection::Feeds,
            &json!({ "id": "not-a-uuid", "createdAt": "yesterday", "name": "x" }),
        )
        .unwrap();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn encode_rejects_scalars() {
        let err = encode(Collection::Logs, &42).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn merge_is_shallow() {
        let fields = encode(Collection::Feeds, &json!({ "name": "a", "price": "10" })).unwrap();
        let mut doc = Document::new(Collection::Feeds, fields);
        let patch = encode(Collection::Feeds, &json!({ "price": "12" })).unwrap();
        doc.merge(patch);

        assert_eq!(doc.fields.get("name"), Some(&json!("a")));
        assert_eq!(doc.fields.get("price"), Some(&json!("12")));
        assert!(doc.updated_at >= doc.created_at);
    }
}
