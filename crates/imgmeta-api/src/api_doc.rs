//! OpenAPI documentation, served at `/api/openapi.json` with a RapiDoc UI at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use imgmeta_core::models;

pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgmeta API",
        version = "0.1.0",
        description = "Image metadata service. Image content is stored by a separate image service; this API keeps description, location and timestamps for each image and coordinates uploads and deletions with that service."
    ),
    paths(
        handlers::index::index,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
        handlers::images::list_images,
        handlers::images::create_image,
        handlers::images::get_image,
        handlers::images::replace_image,
        handlers::images::modify_image,
        handlers::images::delete_image,
    ),
    components(
        schemas(
            models::ImageResponse,
            models::CreateImageRequest,
            models::ReplaceImageRequest,
            models::ModifyImageRequest,
            handlers::index::IndexResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "images", description = "Image records and their image service counterparts"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "meta", description = "API index")
    )
)]
pub struct ApiDoc;
