//! Startup configuration checks
//!
//! `Config::validate` rejects settings that cannot work; this adds the checks that
//! need the rest of the application, such as parsing the token key.

use crate::auth::TokenVerifier;
use anyhow::Result;
use imgmeta_core::{Config, MetadataStoreBackend};
use imgmeta_infra::LogFormat;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    TokenVerifier::from_pem(config.jwt_public_key(), config.jwt_algorithm())
        .map_err(|e| anyhow::anyhow!("PUBLIC_KEY / JWT_ALGORITHM rejected: {}", e))?;

    if config.log_format().parse::<LogFormat>().is_err() {
        return Err(anyhow::anyhow!(
            "LOG_FORMAT must be 'text' or 'json', got '{}'",
            config.log_format()
        ));
    }

    if config.is_production() && config.metadata_store() == MetadataStoreBackend::Memory {
        return Err(anyhow::anyhow!(
            "METADATA_STORE=memory is not allowed in production"
        ));
    }

    Ok(())
}
