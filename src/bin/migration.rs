//! Creates or upgrades the `documents` schema, then exits.
//!
//! Production config leaves `auto_migrate` off, so run this once per deploy
//! before starting the server against a SQL backend.

use anyhow::Context;
use tracing::info;

use godown_api::{config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    if cfg.uses_in_memory_store() {
        anyhow::bail!("store_backend is in-memory; there is no schema to migrate");
    }

    info!("Starting database migration");
    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    db::run_migrations(&pool)
        .await
        .context("database migration failed")?;
    db::close_pool(pool).await?;

    info!("Migration completed successfully");
    Ok(())
}
