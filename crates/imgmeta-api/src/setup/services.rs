//! Service wiring

use crate::auth::TokenVerifier;
use crate::services::RecordService;
use crate::state::AppState;
use anyhow::{Context, Result};
use imgmeta_core::validation::PayloadValidator;
use imgmeta_core::Config;
use imgmeta_db::ImageRepository;
use imgmeta_storage::HttpImageStorage;
use std::sync::Arc;
use std::time::Duration;

/// Build the token verifier, image service client and record service around `store`
pub fn initialize_services(
    config: &Config,
    store: Arc<dyn ImageRepository>,
) -> Result<Arc<AppState>> {
    let verifier = TokenVerifier::from_pem(config.jwt_public_key(), config.jwt_algorithm())
        .map_err(|e| anyhow::anyhow!("Failed to load token verification key: {}", e))?;
    tracing::info!(algorithm = ?verifier.algorithm(), "Token verifier ready");

    let images = HttpImageStorage::new(
        config.image_service_url(),
        config.image_service_token_header(),
        config.image_service_access_token(),
        Duration::from_secs(config.image_service_timeout_secs()),
    )
    .context("Failed to create image service client")?;
    tracing::info!(url = %images.base_url(), "Image service client ready");

    let validator = PayloadValidator::new(config.allowed_content_types().to_vec());
    let records = RecordService::new(store.clone(), Arc::new(images), validator);

    Ok(Arc::new(AppState::new(records, store, Arc::new(verifier))))
}
