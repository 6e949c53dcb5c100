use crate::traits::ImageRepository;
use async_trait::async_trait;
use chrono::Utc;
use imgmeta_core::models::{ImageRecord, ImageUpdate, NewImage};
use imgmeta_core::validation::{normalize_text, validate_image_url};
use imgmeta_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process image record store keyed by `img_id`
#[derive(Clone, Default)]
pub struct InMemoryImageRepository {
    images: Arc<RwLock<HashMap<String, ImageRecord>>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn get_all(&self) -> Result<Vec<ImageRecord>, AppError> {
        let mut images: Vec<ImageRecord> = self.images.read().await.values().cloned().collect();
        images.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.img_id.cmp(&b.img_id))
        });
        Ok(images)
    }

    async fn get_by_id(&self, img_id: &str) -> Result<Option<ImageRecord>, AppError> {
        Ok(self.images.read().await.get(img_id).cloned())
    }

    #[tracing::instrument(skip(self, image), fields(db.table = "memory", db.operation = "insert", db.record_id = %image.img_id))]
    async fn add(&self, image: NewImage) -> Result<ImageRecord, AppError> {
        validate_image_url(&image.image_url)?;

        let mut images = self.images.write().await;
        if images.contains_key(&image.img_id) {
            return Err(AppError::Conflict(format!(
                "Image {} already exists",
                image.img_id
            )));
        }

        let now = Utc::now();
        let record = ImageRecord {
            img_id: image.img_id,
            image_url: image.image_url,
            description: normalize_text(image.description),
            location: normalize_text(image.location),
            created_at: now,
            updated_at: now,
        };
        images.insert(record.img_id.clone(), record.clone());

        Ok(record)
    }

    #[tracing::instrument(skip(self, record, changes), fields(db.table = "memory", db.operation = "update", db.record_id = %record.img_id))]
    async fn update(
        &self,
        record: &ImageRecord,
        changes: &ImageUpdate,
    ) -> Result<ImageRecord, AppError> {
        let mut next = record.clone();
        if !changes.normalized().apply_to(&mut next) {
            tracing::debug!("No metadata changes, skipping write");
            return Ok(next);
        }

        let mut images = self.images.write().await;
        let stored = images
            .get_mut(&record.img_id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
        stored.description = next.description;
        stored.location = next.location;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "memory", db.operation = "delete", db.record_id = %record.img_id))]
    async fn remove(&self, record: &ImageRecord) -> Result<(), AppError> {
        self.images
            .write()
            .await
            .remove(&record.img_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
