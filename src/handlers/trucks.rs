use super::{
    common::{created, ok},
    AppState,
};
use crate::{
    errors::ServiceError,
    models::{MovementType, StockLine, TruckMovement},
    services::MovementOutcome,
    ApiResponse,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

pub fn truck_routes() -> Router<AppState> {
    Router::new().route("/movements", get(list_movements).post(record_movement))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementRequest {
    pub truck_number: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Comma separated destination names
    #[serde(default)]
    pub destinations: String,
    pub items: Vec<StockLine>,
}

/// List recorded truck movements
#[utoipa::path(
    get,
    path = "/api/v1/trucks/movements",
    responses(
        (status = 200, description = "Movements in insertion order", body = ApiResponse<Vec<TruckMovement>>)
    ),
    tag = "trucks"
)]
pub async fn list_movements(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TruckMovement>>>, ServiceError> {
    let movements = state.services.movements.movements().await?;
    Ok(ok(movements))
}

/// Record a truck arriving at or leaving the warehouse
#[utoipa::path(
    post,
    path = "/api/v1/trucks/movements",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded", body = ApiResponse<MovementOutcome>),
        (status = 400, description = "Invalid movement", body = crate::errors::ErrorResponse)
    ),
    tag = "trucks"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MovementOutcome>>), ServiceError> {
    let outcome = state
        .services
        .movements
        .record_movement(
            &payload.truck_number,
            payload.movement_type,
            &payload.destinations,
            payload.items,
        )
        .await?;
    Ok(created(outcome))
}
