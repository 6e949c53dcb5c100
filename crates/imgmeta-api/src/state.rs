//! Shared application state

use crate::auth::TokenVerifier;
use crate::services::RecordService;
use imgmeta_db::ImageRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub records: RecordService,
    /// Metadata store, also used directly by readiness checks
    pub store: Arc<dyn ImageRepository>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        records: RecordService,
        store: Arc<dyn ImageRepository>,
        verifier: Arc<TokenVerifier>,
    ) -> Self {
        Self {
            records,
            store,
            verifier,
        }
    }
}
