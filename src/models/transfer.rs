use super::StockLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Append-only record of stock moved directly between two trucks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectTransfer {
    pub id: Uuid,
    pub source_truck_number: String,
    pub dest_truck_number: String,
    pub items: Vec<StockLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DirectTransferDraft<'a> {
    pub source_truck_number: &'a str,
    pub dest_truck_number: &'a str,
    pub items: &'a [StockLine],
}
