use crate::error::HttpAppError;
use axum::{http::Uri, response::IntoResponse, Json};
use imgmeta_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses((status = 200, description = "API greeting", body = IndexResponse))
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "You got Resource API v1!".to_string(),
    })
}

/// Fallback for unknown paths, in the same error shape as every other failure.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    HttpAppError(AppError::NotFound(format!("No route for {}", uri.path())))
}
