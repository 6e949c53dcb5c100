use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::normalize_text;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Image metadata record as kept by the metadata store.
///
/// `img_id` is the image service's identifier for the binary object and doubles as the
/// public `id`. The record never leaves the service in this shape; use
/// [`ImageRecord::to_public_view`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ImageRecord {
    pub img_id: String,
    pub image_url: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public JSON view of an image record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    /// Identifier assigned by the image service
    pub id: String,
    pub image_url: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Strip internal fields and expose `img_id` as `id`.
    pub fn to_public_view(&self) -> ImageResponse {
        self.clone().into()
    }
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        ImageResponse {
            id: record.img_id,
            image_url: record.image_url,
            description: record.description,
            location: record.location,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Fields for a new record, available only after the image service confirmed the upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub img_id: String,
    pub image_url: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Metadata changes for an existing record.
///
/// The outer `Option` says whether a field is touched at all; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUpdate {
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl ImageUpdate {
    /// Apply the changes that differ from `record`, returning whether anything changed.
    pub fn apply_to(&self, record: &mut ImageRecord) -> bool {
        let mut changed = false;

        if let Some(description) = &self.description {
            if record.description != *description {
                record.description = description.clone();
                changed = true;
            }
        }

        if let Some(location) = &self.location {
            if record.location != *location {
                record.location = location.clone();
                changed = true;
            }
        }

        changed
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.location.is_none()
    }

    /// Same changes with free-text values trimmed.
    pub fn normalized(&self) -> ImageUpdate {
        ImageUpdate {
            description: self.description.clone().map(normalize_text),
            location: self.location.clone().map(normalize_text),
        }
    }
}

/// Body of `POST /images`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
    /// Base64-encoded image bytes
    pub data: String,
    pub content_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `PUT /images/{id}`.
///
/// Replaces both metadata fields. `data`, when sent, must be valid base64 but is not
/// re-uploaded to the image service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceImageRequest {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `PATCH /images/{id}`. Only the fields present are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifyImageRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}
