use crate::traits::ImageRepository;
use async_trait::async_trait;
use imgmeta_core::models::{ImageRecord, ImageUpdate, NewImage};
use imgmeta_core::validation::{normalize_text, validate_image_url};
use imgmeta_core::AppError;
use sqlx::{PgPool, Postgres};

const IMAGE_COLUMNS: &str = "img_id, image_url, description, location, created_at, updated_at";

/// Repository for image records in PostgreSQL
#[derive(Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    async fn get_all(&self) -> Result<Vec<ImageRecord>, AppError> {
        let images = sqlx::query_as::<Postgres, ImageRecord>(&format!(
            "SELECT {} FROM images ORDER BY created_at ASC, img_id ASC",
            IMAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select", db.record_id = %img_id))]
    async fn get_by_id(&self, img_id: &str) -> Result<Option<ImageRecord>, AppError> {
        let image = sqlx::query_as::<Postgres, ImageRecord>(&format!(
            "SELECT {} FROM images WHERE img_id = $1",
            IMAGE_COLUMNS
        ))
        .bind(img_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    #[tracing::instrument(skip(self, image), fields(db.table = "images", db.operation = "insert", db.record_id = %image.img_id))]
    async fn add(&self, image: NewImage) -> Result<ImageRecord, AppError> {
        validate_image_url(&image.image_url)?;

        // Duplicate img_id surfaces as a unique violation, converted to Conflict
        let record = sqlx::query_as::<Postgres, ImageRecord>(&format!(
            r#"
            INSERT INTO images (img_id, image_url, description, location)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        ))
        .bind(&image.img_id)
        .bind(&image.image_url)
        .bind(normalize_text(image.description))
        .bind(normalize_text(image.location))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self, record, changes), fields(db.table = "images", db.operation = "update", db.record_id = %record.img_id))]
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

        let updated = sqlx::query_as::<Postgres, ImageRecord>(&format!(
            r#"
            UPDATE images
            SET description = $2, location = $3, updated_at = NOW()
            WHERE img_id = $1
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        ))
        .bind(&next.img_id)
        .bind(&next.description)
        .bind(&next.location)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "images", db.operation = "delete", db.record_id = %record.img_id))]
    async fn remove(&self, record: &ImageRecord) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM images WHERE img_id = $1")
            .bind(&record.img_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
