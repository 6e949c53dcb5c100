//! Inbound payload validation
//!
//! Images travel inline as standard base64 (RFC 4648, padded). A payload that fails
//! here is rejected with `InvalidInput` before the image service or the store is touched.

use crate::error::AppError;
use base64::Engine as _;

/// Check that `data` is non-empty, correctly padded standard base64.
pub fn validate_base64_payload(data: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::InvalidInput(
            "Image data must not be empty".to_string(),
        ));
    }

    if data.len() % 4 != 0 {
        return Err(AppError::InvalidInput(
            "Image data is not valid base64".to_string(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map(|_| ())
        .map_err(|_| AppError::InvalidInput("Image data is not valid base64".to_string()))
}

/// Check `content_type` against an allow-list (case-insensitive, parameters ignored).
pub fn validate_content_type(content_type: &str, allowed: &[String]) -> Result<(), AppError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if allowed.iter().any(|a| *a == essence) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Invalid content type '{}', allowed: {:?}",
            content_type, allowed
        )))
    }
}

/// Validator for create and replace payloads.
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    allowed_content_types: Vec<String>,
}

impl PayloadValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types,
        }
    }

    /// Validate an inline image: encoding first, then content type.
    pub fn validate_image(&self, data: &str, content_type: &str) -> Result<(), AppError> {
        validate_base64_payload(data)?;
        validate_content_type(content_type, &self.allowed_content_types)
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }
}
