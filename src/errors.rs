use crate::auth::AuthError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Unprocessable Entity",
    "code": "insufficient_stock",
    "message": "Insufficient stock for feed 550e8400-e29b-41d4-a716-446655440000: requested 25, available 12",
    "request_id": "req-abc123xyz",
    "timestamp": "2024-06-01T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error description
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Insufficient stock for feed {feed_id}: requested {requested}, available {available}")]
    InsufficientStock {
        feed_id: Uuid,
        requested: u32,
        available: u32,
    },

    #[error("Insufficient stock on truck {truck_number} for feed {feed_id}: requested {requested}, available {available}")]
    InsufficientTruckStock {
        truck_number: String,
        feed_id: Uuid,
        requested: u32,
        available: u32,
    },

    #[error("Source truck not found: {0}")]
    SourceTruckNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Store error: {0}")]
    StoreError(StoreError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                ServiceError::NotFound(format!("{} {}", collection, id))
            }
            other => ServiceError::StoreError(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::AuthError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientStock { .. } | Self::InsufficientTruckStock { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::SourceTruckNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::StoreError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation_error",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InsufficientTruckStock { .. } => "insufficient_truck_stock",
            Self::SourceTruckNotFound(_) => "source_truck_not_found",
            Self::NotFound(_) => "not_found",
            Self::AuthError(_) => "authentication_failed",
            Self::StoreError(_) => "store_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Store and internal errors return generic messages.
    pub fn response_message(&self) -> String {
        match self {
            Self::StoreError(_) => "Storage error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InsufficientStock {
                feed_id,
                requested,
                available,
            } => Some(json!({
                "feedId": feed_id,
                "requested": requested,
                "available": available,
            })),
            Self::InsufficientTruckStock {
                truck_number,
                feed_id,
                requested,
                available,
            } => Some(json!({
                "truckNumber": truck_number,
                "feedId": feed_id,
                "requested": requested,
                "available": available,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.code().to_string(),
            message: self.response_message(),
            details: self.details(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("missing".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert_eq!(payload.code, "not_found");
    }

    #[test]
    fn status_code_mapping() {
        let feed_id = Uuid::new_v4();
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InsufficientStock {
                feed_id,
                requested: 5,
                available: 3
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InsufficientTruckStock {
                truck_number: "T1".into(),
                feed_id,
                requested: 5,
                available: 3
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::SourceTruckNotFound("T9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::AuthError("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::StoreError(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test_case::test_case(ServiceError::ValidationError("x".into()) => "validation_error")]
    #[test_case::test_case(ServiceError::SourceTruckNotFound("T9".into()) => "source_truck_not_found")]
    #[test_case::test_case(ServiceError::NotFound("feed".into()) => "not_found")]
    #[test_case::test_case(ServiceError::AuthError("bad".into()) => "authentication_failed")]
    #[test_case::test_case(ServiceError::InternalError("boom".into()) => "internal_error")]
    fn machine_codes(err: ServiceError) -> &'static str {
        err.code()
    }

    #[test]
    fn store_errors_are_not_leaked() {
        let err = ServiceError::from(StoreError::Unavailable("connection refused".into()));
        assert_eq!(err.response_message(), "Storage error");
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let id = Uuid::new_v4();
        let err = ServiceError::from(StoreError::NotFound {
            collection: Collection::Feeds,
            id,
        });
        assert!(matches!(err, ServiceError::NotFound(msg) if msg.contains(&id.to_string())));
    }

    #[tokio::test]
    async fn insufficient_stock_response_carries_details() {
        let feed_id = Uuid::new_v4();
        let response = ServiceError::InsufficientStock {
            feed_id,
            requested: 25,
            available: 12,
        }
        .into_response();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let details = payload.details.unwrap();
        assert_eq!(details["requested"], 25);
        assert_eq!(details["available"], 12);
    }
}
