use crate::AppState;
use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Godown API",
        version = "1.0.0",
        description = r#"
# Godown Feed Inventory API

Tracks bags of shrimp and fish feed held in a warehouse ("godown") and on the
trucks that serve it.

## Features

- **Feed Catalog**: Feed products with category and price
- **Warehouse Ledger**: Bag counts per feed with per-category totals
- **Truck Movements**: Incoming deliveries and outgoing dispatches
- **Direct Transfers**: Truck-to-truck stock moves that bypass the warehouse
- **Audit Log**: One entry per movement, load registration and transfer

## Authentication

Only catalog mutations need an admin session. Open one with the admin
passcode and send the returned token in the Authorization header:

```
Authorization: Bearer <token>
```

## Error Handling

Errors share one body format:

```json
{
  "error": "Unprocessable Entity",
  "code": "insufficient_stock",
  "message": "Insufficient stock for feed ...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "admin", description = "Admin session endpoints"),
        (name = "feeds", description = "Feed catalog endpoints"),
        (name = "stock", description = "Warehouse stock endpoints"),
        (name = "trucks", description = "Truck movement endpoints"),
        (name = "transfers", description = "Truck load and direct transfer endpoints"),
        (name = "logs", description = "Audit log endpoints"),
        (name = "snapshot", description = "Whole-inventory snapshot")
    ),
    paths(
        crate::handlers::admin::open_session,

        crate::handlers::feeds::list_feeds,
        crate::handlers::feeds::get_feed,
        crate::handlers::feeds::add_feed,
        crate::handlers::feeds::edit_feed,
        crate::handlers::feeds::delete_feed,

        crate::handlers::stock::list_stock,
        crate::handlers::stock::stock_summary,
        crate::handlers::stock::increase_stock,
        crate::handlers::stock::decrease_stock,

        crate::handlers::trucks::list_movements,
        crate::handlers::trucks::record_movement,

        crate::handlers::transfers::list_loads,
        crate::handlers::transfers::get_load,
        crate::handlers::transfers::register_load,
        crate::handlers::transfers::list_transfers,
        crate::handlers::transfers::create_transfer,

        crate::handlers::logs::list_logs,
        crate::handlers::snapshot::snapshot,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::models::StockLine,
            crate::models::FeedCategory,
            crate::models::MovementType,
            crate::models::LogAction,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDocV1::openapi()) }),
    )
}
