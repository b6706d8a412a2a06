use crate::{
    errors::ServiceError,
    models::{LogAction, LogEntry, LogPayload},
    store::{Collection, DocumentStore, DocumentStoreExt},
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Append-only audit log of truck entries, load registrations and transfers.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn DocumentStore>,
}

impl AuditLog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, payload: LogPayload) -> Result<LogEntry, ServiceError> {
        let entry: LogEntry = self.store.create_as(Collection::Logs, &payload).await?;
        debug!(log_id = %entry.id, action = %entry.action(), "audit entry appended");
        Ok(entry)
    }

    pub async fn entries(&self) -> Result<Vec<LogEntry>, ServiceError> {
        Ok(self.store.list_as(Collection::Logs).await?)
    }

    pub async fn entries_for(&self, action: LogAction) -> Result<Vec<LogEntry>, ServiceError> {
        Ok(self
            .store
            .query_as(Collection::Logs, "action", &json!(action))
            .await?)
    }
}
