//! Configuration module
//!
//! Settings are read from the environment (with an optional `.env` file) into
//! [`Config`]: server and database settings in [`BaseConfig`], plus the token
//! verification key and the image service endpoint.

use std::env;

use crate::storage_types::MetadataStoreBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_PAYLOAD_MB: usize = 10;
const IMAGE_SERVICE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_ALGORITHM: &str = "RS256";
const DEFAULT_TOKEN_HEADER: &str = "X-API-Private-Token";
const DEFAULT_CONTENT_TYPES: &str = "image/gif,image/jpeg,image/png";

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub max_payload_bytes: usize,
    pub log_format: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub metadata_store: MetadataStoreBackend,
    pub database_url: Option<String>,
    /// PEM-encoded public key, decoded from the base64 `PUBLIC_KEY` variable.
    pub jwt_public_key: Vec<u8>,
    pub jwt_algorithm: String,
    pub image_service_url: String,
    pub image_service_access_token: String,
    pub image_service_token_header: String,
    pub image_service_timeout_secs: u64,
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        use base64::Engine as _;

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_payload_mb = lookup("MAX_PAYLOAD_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_PAYLOAD_MB);

        let base = BaseConfig {
            server_port: match lookup("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            environment,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            max_payload_bytes: max_payload_mb * 1024 * 1024,
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "text".to_string())
                .to_lowercase(),
        };

        let metadata_store = match lookup("METADATA_STORE") {
            Some(s) => s.parse()?,
            None => MetadataStoreBackend::Postgres,
        };

        let encoded_key = lookup("PUBLIC_KEY")
            .ok_or_else(|| anyhow::anyhow!("PUBLIC_KEY must be set for token verification"))?;
        let jwt_public_key = base64::engine::general_purpose::STANDARD
            .decode(encoded_key.trim())
            .map_err(|e| anyhow::anyhow!("PUBLIC_KEY must be base64-encoded PEM: {}", e))?;

        Ok(Config {
            base,
            metadata_store,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            jwt_public_key,
            jwt_algorithm: lookup("JWT_ALGORITHM")
                .unwrap_or_else(|| DEFAULT_JWT_ALGORITHM.to_string())
                .to_uppercase(),
            image_service_url: lookup("IMAGE_SERVICE_URL")
                .ok_or_else(|| anyhow::anyhow!("IMAGE_SERVICE_URL must be set"))?
                .trim_end_matches('/')
                .to_string(),
            image_service_access_token: lookup("IMAGE_SERVICE_ACCESS_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("IMAGE_SERVICE_ACCESS_TOKEN must be set"))?,
            image_service_token_header: lookup("IMAGE_SERVICE_TOKEN_HEADER")
                .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string()),
            image_service_timeout_secs: lookup("IMAGE_SERVICE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(IMAGE_SERVICE_TIMEOUT_SECS),
            allowed_content_types: lookup("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPES.to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }

        if self.base.db_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Database timeout cannot be 0"));
        }

        if self.metadata_store == MetadataStoreBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when METADATA_STORE=postgres"
                    ))
                }
            }
        }

        if !self.image_service_url.starts_with("http://")
            && !self.image_service_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "IMAGE_SERVICE_URL must be an http(s) URL"
            ));
        }

        if self.image_service_timeout_secs == 0 {
            return Err(anyhow::anyhow!("IMAGE_SERVICE_TIMEOUT_SECS cannot be 0"));
        }

        if self.jwt_algorithm.starts_with("HS") {
            return Err(anyhow::anyhow!(
                "JWT_ALGORITHM {} is symmetric; a public-key algorithm is required",
                self.jwt_algorithm
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES cannot be empty"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.base.max_payload_bytes
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn metadata_store(&self) -> MetadataStoreBackend {
        self.metadata_store
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn jwt_public_key(&self) -> &[u8] {
        &self.jwt_public_key
    }

    pub fn jwt_algorithm(&self) -> &str {
        &self.jwt_algorithm
    }

    pub fn image_service_url(&self) -> &str {
        &self.image_service_url
    }

    pub fn image_service_access_token(&self) -> &str {
        &self.image_service_access_token
    }

    pub fn image_service_token_header(&self) -> &str {
        &self.image_service_token_header
    }

    pub fn image_service_timeout_secs(&self) -> u64 {
        self.image_service_timeout_secs
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }
}
