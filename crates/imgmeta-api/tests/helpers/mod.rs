#![allow(dead_code)]

pub mod auth;
pub mod fakes;

use axum_test::TestServer;
use base64::Engine as _;
use fakes::{CountingStore, FakeImageService};
use imgmeta_api::auth::TokenVerifier;
use imgmeta_api::services::RecordService;
use imgmeta_api::setup::routes::setup_routes;
use imgmeta_api::AppState;
use imgmeta_core::validation::PayloadValidator;
use imgmeta_core::Config;
use std::collections::HashMap;
use std::sync::Arc;

/// Test application: the real router over a fake image service and a counting store
pub struct TestApp {
    pub server: TestServer,
    pub images: Arc<FakeImageService>,
    pub store: Arc<CountingStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    test_config_with(&[])
}

/// Test configuration with extra environment variables layered on top.
pub fn test_config_with(overrides: &[(&str, &str)]) -> Config {
    let public_key = base64::engine::general_purpose::STANDARD.encode(auth::ES256_PUBLIC);
    let mut vars: HashMap<&str, String> = HashMap::from([
        ("PUBLIC_KEY", public_key),
        ("JWT_ALGORITHM", "ES256".to_string()),
        ("METADATA_STORE", "memory".to_string()),
        ("IMAGE_SERVICE_URL", "http://image-service.test/images".to_string()),
        ("IMAGE_SERVICE_ACCESS_TOKEN", "test-token".to_string()),
    ]);
    for &(key, value) in overrides {
        vars.insert(key, value.to_string());
    }
    let config = Config::from_lookup(|k| vars.get(k).cloned()).expect("test config");
    config.validate().expect("valid test config");
    config
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: Config) -> TestApp {
    let images = Arc::new(FakeImageService::default());
    let store = Arc::new(CountingStore::default());

    let verifier = TokenVerifier::from_pem(config.jwt_public_key(), config.jwt_algorithm())
        .expect("test verifier");
    let records = RecordService::new(
        store.clone(),
        images.clone(),
        PayloadValidator::new(config.allowed_content_types().to_vec()),
    );
    let state = Arc::new(AppState::new(records, store.clone(), Arc::new(verifier)));

    let router = setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        images,
        store,
    }
}
