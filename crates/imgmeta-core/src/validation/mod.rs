//! Validation modules
//!
//! `payload` guards inbound request bodies before any remote or store call;
//! `record` holds the field rules the metadata store enforces on write.

pub mod payload;
pub mod record;

pub use payload::{validate_base64_payload, validate_content_type, PayloadValidator};
pub use record::{normalize_text, validate_image_url};
