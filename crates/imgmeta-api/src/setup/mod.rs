//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgmeta_core::Config;
use imgmeta_infra::LogFormat;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    let log_format = config.log_format().parse().unwrap_or(LogFormat::Text);
    imgmeta_infra::init_telemetry(log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        metadata_store = %config.metadata_store(),
        "Configuration loaded and validated successfully"
    );

    let store = database::setup_store(&config).await?;
    let state = services::initialize_services(&config, store)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
