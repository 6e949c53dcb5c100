//! Application services

pub mod records;

pub use records::RecordService;
