//! Metadata store implementations

pub mod image;
pub mod memory;

pub use image::PgImageRepository;
pub use memory::InMemoryImageRepository;
