//! Record service: image operations spanning the image service and the metadata store
//!
//! Create and delete always touch the image service first and the metadata store
//! second. Each step gates the next, and nothing is compensated automatically:
//!
//! - create: remote upload succeeded, metadata insert failed. The remote image is
//!   orphaned; logged at error with its id.
//! - delete: remote delete succeeded, metadata removal failed. The record points at
//!   nothing; logged at error and reported as an internal error.
//!
//! Both sagas run on their own task so a dropped request (client disconnect, request
//! timeout) cannot stop them between the two steps.

use imgmeta_core::models::{
    CreateImageRequest, ImageRecord, ImageUpdate, ModifyImageRequest, NewImage,
    ReplaceImageRequest,
};
use imgmeta_core::validation::{validate_base64_payload, validate_content_type, PayloadValidator};
use imgmeta_core::AppError;
use imgmeta_db::ImageRepository;
use imgmeta_storage::ImageStorage;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn ImageRepository>,
    images: Arc<dyn ImageStorage>,
    validator: PayloadValidator,
}

impl RecordService {
    pub fn new(
        store: Arc<dyn ImageRepository>,
        images: Arc<dyn ImageStorage>,
        validator: PayloadValidator,
    ) -> Self {
        Self {
            store,
            images,
            validator,
        }
    }

    /// Validate, upload to the image service, then record the metadata.
    pub async fn create(&self, request: CreateImageRequest) -> Result<ImageRecord, AppError> {
        // Nothing may reach the image service or the store before this passes
        self.validator
            .validate_image(&request.data, &request.content_type)?;

        let service = self.clone();
        run_to_completion(async move { service.create_saga(request).await }).await
    }

    async fn create_saga(&self, request: CreateImageRequest) -> Result<ImageRecord, AppError> {
        let remote = self
            .images
            .create_image(&request.data, &request.content_type)
            .await?;

        let new_image = NewImage {
            img_id: remote.id.clone(),
            image_url: remote.image_url,
            description: request.description,
            location: request.location,
        };

        match self.store.add(new_image).await {
            Ok(record) => {
                tracing::info!(image_id = %record.img_id, "Image record created");
                Ok(record)
            }
            Err(err) => {
                tracing::error!(
                    remote_id = %remote.id,
                    error = %err,
                    "Image stored remotely but metadata insert failed; remote image is orphaned"
                );
                Err(AppError::Internal(format!(
                    "Image {} was uploaded but its metadata could not be saved: {}",
                    remote.id, err
                )))
            }
        }
    }

    /// All records, oldest first.
    pub async fn list(&self) -> Result<Vec<ImageRecord>, AppError> {
        self.store.get_all().await
    }

    /// Look up the record an id-addressed request refers to.
    pub async fn resolve(&self, id: &str) -> Result<ImageRecord, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }

    /// Replace both metadata fields. A field missing from the request is cleared.
    ///
    /// `data` is checked for valid encoding when present but is not re-uploaded.
    pub async fn replace(
        &self,
        record: &ImageRecord,
        request: ReplaceImageRequest,
    ) -> Result<ImageRecord, AppError> {
        if let Some(data) = request.data.as_deref() {
            validate_base64_payload(data)?;
        }
        if let Some(content_type) = request.content_type.as_deref() {
            validate_content_type(content_type, self.validator.allowed_content_types())?;
        }

        let changes = ImageUpdate {
            description: Some(request.description),
            location: Some(request.location),
        };
        self.store.update(record, &changes).await
    }

    /// Change only the metadata fields present in the request.
    pub async fn modify(
        &self,
        record: &ImageRecord,
        request: ModifyImageRequest,
    ) -> Result<ImageRecord, AppError> {
        let changes = ImageUpdate {
            description: request.description.map(Some),
            location: request.location.map(Some),
        };
        if changes.is_empty() {
            return Ok(record.clone());
        }
        self.store.update(record, &changes).await
    }

    /// Delete from the image service, then remove the metadata.
    pub async fn delete(&self, record: ImageRecord) -> Result<(), AppError> {
        let service = self.clone();
        run_to_completion(async move { service.delete_saga(record).await }).await
    }

    async fn delete_saga(&self, record: ImageRecord) -> Result<(), AppError> {
        // On failure the record stays; nothing was deleted anywhere
        self.images.delete_image(&record.img_id).await?;

        if let Err(err) = self.store.remove(&record).await {
            tracing::error!(
                remote_id = %record.img_id,
                error = %err,
                "Image deleted remotely but metadata removal failed; record is orphaned"
            );
            return Err(AppError::Internal(format!(
                "Image {} was deleted but its metadata could not be removed: {}",
                record.img_id, err
            )));
        }

        tracing::info!(image_id = %record.img_id, "Image record deleted");
        Ok(())
    }
}

/// Drive `saga` on its own task, keeping the caller's span.
async fn run_to_completion<F, T>(saga: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(saga.instrument(tracing::Span::current()))
        .await
        .map_err(|e| AppError::Internal(format!("Image operation task failed: {}", e)))?
}
