//! imgmeta metadata store
//!
//! The [`ImageRepository`] trait is the metadata store contract. [`PgImageRepository`]
//! persists records in PostgreSQL; [`InMemoryImageRepository`] keeps them in process
//! for development and tests.

pub mod db;
pub mod traits;

pub use db::{InMemoryImageRepository, PgImageRepository};
pub use traits::ImageRepository;
