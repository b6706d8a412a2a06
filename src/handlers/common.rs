use crate::ApiResponse;
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// 200 with the standard envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 201 with the standard envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}
