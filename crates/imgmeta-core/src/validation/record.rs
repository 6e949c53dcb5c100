//! Field rules for stored image records

use crate::error::AppError;
use validator::ValidateUrl;

/// `imageUrl` must be an absolute http(s) URL.
pub fn validate_image_url(url: &str) -> Result<(), AppError> {
    let scheme_ok = url.starts_with("http://") || url.starts_with("https://");
    if scheme_ok && url.validate_url() {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(format!(
            "{} is not a valid URL.",
            url
        )))
    }
}

/// Trim free-text metadata.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
