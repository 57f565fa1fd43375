//! Service wiring

use crate::state::{AppState, DbState};
use anyhow::{Context, Result};
use clutterscore_connectors::DefaultConnectorFactory;
use clutterscore_core::models::ToolSource;
use clutterscore_core::Config;
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let connectors =
        DefaultConnectorFactory::from_config(config).context("Failed to build platform connectors")?;

    let refreshable: Vec<&str> = ToolSource::ALL
        .iter()
        .filter(|source| config.oauth_client(**source).is_some())
        .map(|source| source.as_str())
        .collect();
    tracing::info!(
        connector_timeout_secs = config.connector_timeout().as_secs(),
        token_refresh = %refreshable.join(","),
        audit_not_found_attempts = config.audit_not_found_attempts(),
        "Platform connectors initialized"
    );

    Ok(Arc::new(AppState::new(
        config.clone(),
        DbState::postgres(pool),
        Arc::new(connectors),
    )))
}
