use super::{Collection, Document, DocumentStore, Fields, StoreError};
use crate::entities::document::{self, Entity as DocumentEntity};
use async_trait::async_trait;
use metrics::{counter, histogram};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error};
use uuid::Uuid;

/// Document store persisted in the `documents` table through sea-orm.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_model(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<document::Model, StoreError> {
        DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection.as_str()))
            .filter(document::Column::Id.eq(id.to_string()))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound { collection, id })
    }
}

fn to_document(collection: Collection, model: document::Model) -> Result<Document, StoreError> {
    let id = Uuid::parse_str(&model.id).map_err(|e| StoreError::Malformed {
        collection,
        reason: format!("invalid id {}: {}", model.id, e),
    })?;
    let fields = match model.body {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Malformed {
                collection,
                reason: format!("document {} body is not an object: {}", id, other),
            })
        }
    };
    Ok(Document {
        id,
        collection,
        fields,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn record(operation: &'static str, collection: Collection, started: Instant) {
    counter!("godown_store.operations", 1, "operation" => operation, "collection" => collection.as_str());
    histogram!(
        "godown_store.operation.duration",
        started.elapsed().as_secs_f64(),
        "operation" => operation
    );
}

#[async_trait]
impl DocumentStore for SeaOrmStore {
    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let started = Instant::now();
        let models = DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection.as_str()))
            .order_by_asc(document::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!(collection = %collection, error = %e, "failed to list documents");
                StoreError::from(e)
            })?;
        record("list_all", collection, started);

        models
            .into_iter()
            .map(|model| to_document(collection, model))
            .collect()
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let started = Instant::now();
        let doc = Document::new(collection, fields);
        debug!(collection = %collection, id = %doc.id, "creating document");

        let active = document::ActiveModel {
            id: Set(doc.id.to_string()),
            collection: Set(collection.as_str().to_string()),
            body: Set(Value::Object(doc.fields.clone())),
            created_at: Set(doc.created_at),
            updated_at: Set(doc.updated_at),
            ..Default::default()
        };
        active.insert(&self.db).await.map_err(|e| {
            error!(collection = %collection, error = %e, "failed to create document");
            StoreError::from(e)
        })?;
        record("create", collection, started);

        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let started = Instant::now();
        let model = self.find_model(collection, id).await?;
        let mut doc = to_document(collection, model.clone())?;
        doc.merge(fields);

        let mut active: document::ActiveModel = model.into();
        active.body = Set(Value::Object(doc.fields.clone()));
        active.updated_at = Set(doc.updated_at);
        active.update(&self.db).await.map_err(|e| {
            error!(collection = %collection, id = %id, error = %e, "failed to update document");
            StoreError::from(e)
        })?;
        record("update", collection, started);

        Ok(doc)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        let started = Instant::now();
        let result = DocumentEntity::delete_many()
            .filter(document::Column::Collection.eq(collection.as_str()))
            .filter(document::Column::Id.eq(id.to_string()))
            .exec(&self.db)
            .await?;
        record("delete", collection, started);

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound { collection, id });
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::check_connection(&self.db).await
    }
}
