//! imgmeta API library
//!
//! HTTP surface of the image metadata service: token verification, the record
//! service that coordinates the image service with the metadata store, handlers,
//! and application setup.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::RecordService;
pub use state::AppState;
