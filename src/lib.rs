//! Godown API Library
//!
//! Feed inventory for a warehouse ("godown") and the trucks that load from,
//! deliver to, and trade stock with it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;
pub mod store;
pub mod tracing;

use axum::{
    extract::{FromRef, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::AdminGate;
use crate::store::DocumentStore;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub admin_gate: Arc<AdminGate>,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Builds the state and every service over `store`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let admin_gate = Arc::new(AdminGate::from_config(&config));
        let services = handlers::AppServices::new(store.clone(), event_sender.clone());
        Self {
            store,
            config,
            event_sender,
            admin_gate,
            services,
        }
    }
}

impl FromRef<AppState> for Arc<AdminGate> {
    fn from_ref(state: &AppState) -> Self {
        state.admin_gate.clone()
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Every versioned route, relative to `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .route("/admin/session", post(handlers::admin::open_session))
        .nest("/feeds", handlers::feeds::feed_routes())
        .nest("/stock", handlers::stock::stock_routes())
        .nest("/trucks", handlers::trucks::truck_routes())
        .nest("/trucks/loads", handlers::transfers::load_routes())
        .nest("/transfers", handlers::transfers::transfer_routes())
        .nest("/logs", handlers::logs::log_routes())
        .route("/snapshot", get(handlers::snapshot::snapshot))
}

async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git": option_env!("GIT_HASH").unwrap_or("unknown"),
        "build_time": option_env!("BUILD_TIME").unwrap_or("unknown"),
        "service": "godown-api",
        "store": if state.config.uses_in_memory_store() { "in-memory" } else { "sql" },
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let store_status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            ::tracing::warn!(error = %err, "store health check failed");
            "unhealthy"
        }
    };

    Ok(Json(ApiResponse::success(json!({
        "status": store_status,
        "checks": { "store": store_status },
        "timestamp": Utc::now().to_rfc3339(),
    }))))
}
