//! Route configuration and setup

use crate::api_doc::{ApiDoc, OPENAPI_JSON_PATH};
use crate::auth::middleware::auth_middleware;
use crate::handlers::{health, images, index};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use imgmeta_core::Config;
use imgmeta_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Authentication runs before resolution, validation and the handler
    let image_routes = Router::new()
        .route("/images", get(images::list_images).post(images::create_image))
        .route(
            "/images/{id}",
            get(images::get_image)
                .put(images::replace_image)
                .patch(images::modify_image)
                .delete(images::delete_image),
        )
        .route_layer(from_fn_with_state(state.verifier.clone(), auth_middleware));

    let public_routes = Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    let security_headers = SecurityHeadersConfig::for_environment(config.is_production());

    // Room for one image service call plus one store call
    let request_timeout =
        Duration::from_secs(config.image_service_timeout_secs() + config.db_timeout_seconds());

    tracing::info!(
        max_payload_bytes = config.max_payload_bytes(),
        request_timeout_secs = request_timeout.as_secs(),
        "HTTP limits configured"
    );

    let app = public_routes
        .merge(image_routes)
        .merge(RapiDoc::with_openapi(OPENAPI_JSON_PATH, ApiDoc::openapi()).path("/docs"))
        .fallback(index::not_found)
        .layer(DefaultBodyLimit::max(config.max_payload_bytes()))
        .layer(RequestBodyLimitLayer::new(config.max_payload_bytes()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn_with_state(
            security_headers,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
