//! imgmeta image service client
//!
//! Binary image content lives in a separate image service. This crate defines the
//! [`ImageStorage`] contract used by the record service and [`HttpImageStorage`], the
//! reqwest-based client that talks to the real service.
//!
//! Calls are never retried: a failed create or delete aborts the calling operation.

pub mod http;
pub mod traits;

pub use http::HttpImageStorage;
pub use traits::{ImageServiceError, ImageServiceResult, ImageStorage, RemoteImage};
