use super::{common::ok, AppState};
use crate::{
    errors::ServiceError,
    models::{
        DirectTransfer, Feed, LogEntry, StockSummary, TruckLoad, TruckMovement,
        WarehouseStockEntry,
    },
    ApiResponse,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every collection at once, as a dashboard would load it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub feeds: Vec<Feed>,
    pub godown_stock: Vec<WarehouseStockEntry>,
    pub summary: StockSummary,
    pub trucks: Vec<TruckMovement>,
    pub truck_loads: Vec<TruckLoad>,
    pub direct_transfers: Vec<DirectTransfer>,
    pub logs: Vec<LogEntry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/snapshot",
    responses(
        (status = 200, description = "Full inventory snapshot", body = ApiResponse<Snapshot>)
    ),
    tag = "snapshot"
)]
pub async fn snapshot(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Snapshot>>, ServiceError> {
    let services = &state.services;
    let (feeds, godown_stock, trucks, truck_loads, direct_transfers, logs) = tokio::try_join!(
        services.catalog.list_feeds(),
        services.ledger.entries(),
        services.movements.movements(),
        services.transfers.loads(),
        services.transfers.transfers(),
        services.audit.entries(),
    )?;
    let summary = StockSummary::compute(&feeds, &godown_stock);

    Ok(ok(Snapshot {
        feeds,
        godown_stock,
        summary,
        trucks,
        truck_loads,
        direct_transfers,
        logs,
    }))
}
