use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Metadata store backends
///
/// Selected by `METADATA_STORE`. `Memory` keeps records in process and is meant for
/// local development and tests; nothing survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataStoreBackend {
    Postgres,
    Memory,
}

impl FromStr for MetadataStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(MetadataStoreBackend::Postgres),
            "memory" => Ok(MetadataStoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid metadata store backend: {}", s)),
        }
    }
}

impl Display for MetadataStoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataStoreBackend::Postgres => write!(f, "postgres"),
            MetadataStoreBackend::Memory => write!(f, "memory"),
        }
    }
}
