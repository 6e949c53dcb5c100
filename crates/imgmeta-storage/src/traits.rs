//! Image service abstraction trait

use async_trait::async_trait;
use imgmeta_core::AppError;
use serde::Deserialize;
use thiserror::Error;

/// Image service call errors
#[derive(Debug, Error)]
pub enum ImageServiceError {
    #[error("Unexpected status {status} from image service (expected {expected})")]
    UnexpectedStatus { status: u16, expected: u16 },

    #[error("Image service request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid image service response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for image service operations
pub type ImageServiceResult<T> = Result<T, ImageServiceError>;

impl From<ImageServiceError> for AppError {
    fn from(err: ImageServiceError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Image created by the image service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImage {
    /// The service's identifier; becomes the record's `img_id`
    pub id: String,
    pub image_url: String,
}

/// Remote image service operations.
///
/// Implementations must not retry. Any failure is surfaced to the caller, which
/// decides whether local state may be touched.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Upload base64-encoded image data and return the service's id and URL
    async fn create_image(
        &self,
        data: &str,
        content_type: &str,
    ) -> ImageServiceResult<RemoteImage>;

    /// Delete an image by the service's id
    async fn delete_image(&self, id: &str) -> ImageServiceResult<()>;
}
