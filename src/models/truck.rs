use super::StockLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MovementType {
    Incoming,
    Outgoing,
}

/// Immutable record of a truck arriving at or leaving the godown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TruckMovement {
    pub id: Uuid,
    pub truck_number: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub destinations: Vec<String>,
    pub items: Vec<StockLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TruckMovementDraft<'a> {
    pub truck_number: &'a str,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub destinations: &'a [String],
    pub items: &'a [StockLine],
}

/// Onboard inventory of a truck, used for direct transfers.
/// At most one load exists per truck number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TruckLoad {
    pub id: Uuid,
    pub truck_number: String,
    pub stock: Vec<StockLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TruckLoad {
    /// Quantity of a feed on board; the first matching line wins
    pub fn quantity_of(&self, feed_id: Uuid) -> u32 {
        self.stock
            .iter()
            .find(|line| line.feed_id == feed_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TruckLoadDraft<'a> {
    pub truck_number: &'a str,
    pub stock: &'a [StockLine],
}

#[derive(Debug, Serialize)]
pub(crate) struct StockPatch<'a> {
    pub stock: &'a [StockLine],
}

/// Splits a comma separated destination list, trimming each entry and
/// dropping empty ones.
pub fn parse_destinations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
