use super::{MovementType, StockLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LogAction {
    TruckEntry,
    RegisterTruckLoad,
    DirectTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TruckEntryDetails {
    pub movement_id: Uuid,
    pub truck_number: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub destinations: Vec<String>,
    pub items: Vec<StockLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TruckLoadDetails {
    pub truck_number: String,
    pub stock: Vec<StockLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectTransferDetails {
    pub transfer_id: Uuid,
    pub source_truck_number: String,
    pub dest_truck_number: String,
    pub items: Vec<StockLine>,
}

/// Action-specific body of an audit log entry. Stored with the action name
/// under the `action` key so entries can be filtered by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action")]
pub enum LogPayload {
    TruckEntry(TruckEntryDetails),
    RegisterTruckLoad(TruckLoadDetails),
    DirectTransfer(DirectTransferDetails),
}

impl LogPayload {
    pub fn action(&self) -> LogAction {
        match self {
            Self::TruckEntry(_) => LogAction::TruckEntry,
            Self::RegisterTruckLoad(_) => LogAction::RegisterTruckLoad,
            Self::DirectTransfer(_) => LogAction::DirectTransfer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: LogPayload,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn action(&self) -> LogAction {
        self.payload.action()
    }
}
