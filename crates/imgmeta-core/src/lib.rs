//! imgmeta core library
//!
//! Domain models, error types, configuration, and input validation shared by the
//! metadata store, the image service client and the HTTP API.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::MetadataStoreBackend;
