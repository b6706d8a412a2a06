use super::{
    common::{created, ok},
    AppState,
};
use crate::{
    errors::ServiceError,
    models::{DirectTransfer, StockLine, TruckLoad},
    services::{RegisterLoadOutcome, TransferOutcome},
    ApiResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

pub fn load_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_loads).post(register_load))
        .route("/:truck_number", get(get_load))
}

pub fn transfer_routes() -> Router<AppState> {
    Router::new().route("/", get(list_transfers).post(create_transfer))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLoadRequest {
    pub truck_number: String,
    pub stock: Vec<StockLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub source_truck_number: String,
    pub dest_truck_number: String,
    pub items: Vec<StockLine>,
}

/// List registered truck loads
#[utoipa::path(
    get,
    path = "/api/v1/trucks/loads",
    responses(
        (status = 200, description = "Onboard stock per truck", body = ApiResponse<Vec<TruckLoad>>)
    ),
    tag = "transfers"
)]
pub async fn list_loads(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TruckLoad>>>, ServiceError> {
    let loads = state.services.transfers.loads().await?;
    Ok(ok(loads))
}

/// Fetch the onboard stock of one truck
#[utoipa::path(
    get,
    path = "/api/v1/trucks/loads/{truck_number}",
    params(("truck_number" = String, Path, description = "Truck number")),
    responses(
        (status = 200, description = "Truck load found", body = ApiResponse<TruckLoad>),
        (status = 404, description = "No load registered", body = crate::errors::ErrorResponse)
    ),
    tag = "transfers"
)]
pub async fn get_load(
    State(state): State<AppState>,
    Path(truck_number): Path<String>,
) -> Result<Json<ApiResponse<TruckLoad>>, ServiceError> {
    let load = state
        .services
        .transfers
        .load_for(&truck_number)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("truck load {}", truck_number.trim())))?;
    Ok(ok(load))
}

/// Register (or replace) a truck's onboard stock
#[utoipa::path(
    post,
    path = "/api/v1/trucks/loads",
    request_body = RegisterLoadRequest,
    responses(
        (status = 201, description = "Load registered", body = ApiResponse<RegisterLoadOutcome>),
        (status = 400, description = "Invalid load", body = crate::errors::ErrorResponse)
    ),
    tag = "transfers"
)]
pub async fn register_load(
    State(state): State<AppState>,
    Json(payload): Json<RegisterLoadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterLoadOutcome>>), ServiceError> {
    let outcome = state
        .services
        .transfers
        .register_load(&payload.truck_number, payload.stock)
        .await?;
    Ok(created(outcome))
}

/// List completed direct transfers
#[utoipa::path(
    get,
    path = "/api/v1/transfers",
    responses(
        (status = 200, description = "Transfers in insertion order", body = ApiResponse<Vec<DirectTransfer>>)
    ),
    tag = "transfers"
)]
pub async fn list_transfers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectTransfer>>>, ServiceError> {
    let transfers = state.services.transfers.transfers().await?;
    Ok(ok(transfers))
}

/// Move stock directly from one truck to another
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer completed", body = ApiResponse<TransferOutcome>),
        (status = 400, description = "Invalid transfer", body = crate::errors::ErrorResponse),
        (status = 404, description = "Source truck has no load", body = crate::errors::ErrorResponse),
        (status = 422, description = "Source truck lacks stock", body = crate::errors::ErrorResponse)
    ),
    tag = "transfers"
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferOutcome>>), ServiceError> {
    let outcome = state
        .services
        .transfers
        .transfer(
            &payload.source_truck_number,
            &payload.dest_truck_number,
            payload.items,
        )
        .await?;
    Ok(created(outcome))
}
