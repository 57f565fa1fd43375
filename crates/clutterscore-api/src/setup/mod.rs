//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::Result;
use clutterscore_core::Config;
use std::sync::Arc;

pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing(config.json_logs());
    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let state = services::initialize_services(&config, pool)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
