//! Metadata store contract
//!
//! Implementations own the record invariants: `img_id` uniqueness, `image_url`
//! validity, trimmed free text, and `updated_at` moving only when a field really changed.

use async_trait::async_trait;
use imgmeta_core::models::{ImageRecord, ImageUpdate, NewImage};
use imgmeta_core::AppError;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// All records, oldest first
    async fn get_all(&self) -> Result<Vec<ImageRecord>, AppError>;

    /// Look up a record by the image service's identifier
    async fn get_by_id(&self, img_id: &str) -> Result<Option<ImageRecord>, AppError>;

    /// Insert a record.
    ///
    /// Fails with `Conflict` when `img_id` is taken and `ValidationFailed` when
    /// `image_url` is malformed.
    async fn add(&self, image: NewImage) -> Result<ImageRecord, AppError>;

    /// Apply metadata changes. Values equal to the current ones are skipped; when
    /// nothing differs no write happens and `record` comes back unchanged.
    async fn update(
        &self,
        record: &ImageRecord,
        changes: &ImageUpdate,
    ) -> Result<ImageRecord, AppError>;

    /// Delete a record. Fails with `NotFound` if it is already gone.
    async fn remove(&self, record: &ImageRecord) -> Result<(), AppError>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> Result<(), AppError>;
}
