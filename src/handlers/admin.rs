use super::{common::created, AppState};
use crate::{errors::ServiceError, events::Event, ApiResponse};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchange the admin passcode for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/admin/session",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Admin session opened", body = ApiResponse<SessionToken>),
        (status = 401, description = "Wrong passcode", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionToken>>), ServiceError> {
    let session = state.admin_gate.authenticate(&request.password)?;
    let token = state
        .admin_gate
        .issue_token(&session)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;

    state.event_sender.publish(Event::AdminSessionOpened {
        session_id: session.id(),
    });

    Ok(created(SessionToken {
        token,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at(),
    }))
}
