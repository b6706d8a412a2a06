use super::{
    common::{created, ok},
    AppState,
};
use crate::{
    auth::AdminSession,
    errors::ServiceError,
    models::{Feed, FeedPatch, NewFeed},
    services::{AddFeedOutcome, DeleteFeedOutcome},
    ApiResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feeds).post(add_feed))
        .route("/:id", get(get_feed).patch(edit_feed).delete(delete_feed))
}

/// List the feed catalog
#[utoipa::path(
    get,
    path = "/api/v1/feeds",
    responses(
        (status = 200, description = "All feeds in insertion order", body = ApiResponse<Vec<Feed>>)
    ),
    tag = "feeds"
)]
pub async fn list_feeds(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Feed>>>, ServiceError> {
    let feeds = state.services.catalog.list_feeds().await?;
    Ok(ok(feeds))
}

/// Fetch one feed
#[utoipa::path(
    get,
    path = "/api/v1/feeds/{id}",
    params(("id" = Uuid, Path, description = "Feed id")),
    responses(
        (status = 200, description = "Feed found", body = ApiResponse<Feed>),
        (status = 404, description = "Feed not found", body = crate::errors::ErrorResponse)
    ),
    tag = "feeds"
)]
pub async fn get_feed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Feed>>, ServiceError> {
    let feed = state.services.catalog.get_feed(id).await?;
    Ok(ok(feed))
}

/// Add a feed, optionally with an opening warehouse quantity
#[utoipa::path(
    post,
    path = "/api/v1/feeds",
    request_body = NewFeed,
    responses(
        (status = 201, description = "Feed added", body = ApiResponse<AddFeedOutcome>),
        (status = 400, description = "Invalid feed", body = crate::errors::ErrorResponse),
        (status = 401, description = "Admin session required")
    ),
    security(("bearer_auth" = [])),
    tag = "feeds"
)]
pub async fn add_feed(
    State(state): State<AppState>,
    session: AdminSession,
    Json(payload): Json<NewFeed>,
) -> Result<(StatusCode, Json<ApiResponse<AddFeedOutcome>>), ServiceError> {
    let outcome = state.services.catalog.add_feed(&session, payload).await?;
    Ok(created(outcome))
}

/// Edit a feed's name, category or price
#[utoipa::path(
    patch,
    path = "/api/v1/feeds/{id}",
    params(("id" = Uuid, Path, description = "Feed id")),
    request_body = FeedPatch,
    responses(
        (status = 200, description = "Feed updated", body = ApiResponse<Feed>),
        (status = 400, description = "Invalid patch", body = crate::errors::ErrorResponse),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "Feed not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "feeds"
)]
pub async fn edit_feed(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    Json(patch): Json<FeedPatch>,
) -> Result<Json<ApiResponse<Feed>>, ServiceError> {
    let feed = state.services.catalog.edit_feed(&session, id, patch).await?;
    Ok(ok(feed))
}

/// Delete a feed and its warehouse stock entries
#[utoipa::path(
    delete,
    path = "/api/v1/feeds/{id}",
    params(("id" = Uuid, Path, description = "Feed id")),
    responses(
        (status = 200, description = "Feed deleted", body = ApiResponse<DeleteFeedOutcome>),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "Feed not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "feeds"
)]
pub async fn delete_feed(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFeedOutcome>>, ServiceError> {
    let outcome = state.services.catalog.delete_feed(&session, id).await?;
    Ok(ok(outcome))
}
