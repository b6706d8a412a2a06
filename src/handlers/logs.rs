use super::{common::ok, AppState};
use crate::{
    errors::ServiceError,
    models::{LogAction, LogEntry},
    ApiResponse,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub fn log_routes() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    /// Only return entries for this action
    pub action: Option<LogAction>,
}

/// Read the audit log
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Audit entries in insertion order", body = ApiResponse<Vec<LogEntry>>)
    ),
    tag = "logs"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<ApiResponse<Vec<LogEntry>>>, ServiceError> {
    let entries = match query.action {
        Some(action) => state.services.audit.entries_for(action).await?,
        None => state.services.audit.entries().await?,
    };
    Ok(ok(entries))
}
