use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use http::HeaderValue;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing::{error, info};

use godown_api as api;
use godown_api::store::{DocumentStore, InMemoryStore, SeaOrmStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Pick the document store backend
    let store: Arc<dyn DocumentStore> = if cfg.uses_in_memory_store() {
        info!("Using in-memory document store; data is lost on shutdown");
        Arc::new(InMemoryStore::new())
    } else {
        let db_pool = api::db::establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to database")?;
        if cfg.auto_migrate {
            api::db::run_migrations(&db_pool).await.map_err(|e| {
                error!("Failed running migrations: {}", e);
                e
            })?;
        }
        Arc::new(SeaOrmStore::new(db_pool))
    };

    // Init events
    let (event_sender, event_rx) =
        api::events::EventSender::channel(cfg.event_channel_capacity);
    tokio::spawn(api::events::process_events(
        event_rx,
        cfg.low_stock_threshold,
    ));

    // Compose shared app state
    let app_state = api::AppState::new(store, cfg.clone(), event_sender);

    // Build CORS layer from config
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        anyhow::bail!(
            "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
        );
    };

    let app = Router::<api::AppState>::new()
        .route("/", get(|| async { "godown-api up" }))
        .nest("/api/v1", api::api_v1_routes())
        .merge(api::openapi::openapi_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(api::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            api::middleware_helpers::request_id_middleware,
        ))
        .with_state(app_state);

    let host: std::net::IpAddr = cfg
        .host
        .parse()
        .with_context(|| format!("invalid host address {}", cfg.host))?;
    let addr = SocketAddr::from((host, cfg.port));
    info!("godown-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("godown-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
