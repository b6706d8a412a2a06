use super::{common::ok, AppState};
use crate::{
    errors::ServiceError,
    models::{StockSummary, WarehouseStockEntry},
    ApiResponse,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock))
        .route("/summary", get(stock_summary))
        .route("/:feed_id/increase", post(increase_stock))
        .route("/:feed_id/decrease", post(decrease_stock))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustStockRequest {
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// List warehouse stock entries
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    responses(
        (status = 200, description = "Warehouse ledger", body = ApiResponse<Vec<WarehouseStockEntry>>)
    ),
    tag = "stock"
)]
pub async fn list_stock(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WarehouseStockEntry>>>, ServiceError> {
    let entries = state.services.ledger.entries().await?;
    Ok(ok(entries))
}

/// Per-category stock totals
#[utoipa::path(
    get,
    path = "/api/v1/stock/summary",
    responses(
        (status = 200, description = "Stock totals by feed category", body = ApiResponse<StockSummary>)
    ),
    tag = "stock"
)]
pub async fn stock_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StockSummary>>, ServiceError> {
    let summary = state.services.ledger.summary().await?;
    Ok(ok(summary))
}

/// Manually add bags of a feed to the warehouse
#[utoipa::path(
    post,
    path = "/api/v1/stock/{feed_id}/increase",
    params(("feed_id" = Uuid, Path, description = "Feed id")),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock increased", body = ApiResponse<WarehouseStockEntry>),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Feed not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn increase_stock(
    State(state): State<AppState>,
    Path(feed_id): Path<Uuid>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<Json<ApiResponse<WarehouseStockEntry>>, ServiceError> {
    payload.validate()?;
    state.services.catalog.get_feed(feed_id).await?;
    let entry = state
        .services
        .ledger
        .increase(feed_id, payload.quantity)
        .await?;
    Ok(ok(entry))
}

/// Manually remove bags of a feed from the warehouse
#[utoipa::path(
    post,
    path = "/api/v1/stock/{feed_id}/decrease",
    params(("feed_id" = Uuid, Path, description = "Feed id")),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock decreased", body = ApiResponse<WarehouseStockEntry>),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Feed not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn decrease_stock(
    State(state): State<AppState>,
    Path(feed_id): Path<Uuid>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<Json<ApiResponse<WarehouseStockEntry>>, ServiceError> {
    payload.validate()?;
    state.services.catalog.get_feed(feed_id).await?;
    let entry = state
        .services
        .ledger
        .decrease(feed_id, payload.quantity)
        .await?;
    Ok(ok(entry))
}
