use crate::auth::Caller;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use imgmeta_core::models::{
    CreateImageRequest, ImageRecord, ImageResponse, ModifyImageRequest, ReplaceImageRequest,
};
use imgmeta_core::AppError;
use std::sync::Arc;

/// Record addressed by the `{id}` path segment.
///
/// Resolved once per request, before the body is read, so an unknown id is a 404 on
/// every method regardless of what the body contains.
#[derive(Debug, Clone)]
pub struct ResolvedImage(pub ImageRecord);

impl FromRequestParts<Arc<AppState>> for ResolvedImage {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| HttpAppError(AppError::InvalidInput(e.body_text())))?;

        let record = state.records.resolve(&id).await?;
        Ok(ResolvedImage(record))
    }
}

#[utoipa::path(
    get,
    path = "/images",
    tag = "images",
    responses(
        (status = 200, description = "All image records, oldest first", body = Vec<ImageResponse>),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "list_images", caller = %caller.display_name()))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.records.list().await?;
    let views: Vec<ImageResponse> = records.into_iter().map(ImageResponse::from).collect();
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/images",
    tag = "images",
    request_body = CreateImageRequest,
    responses(
        (status = 201, description = "Image uploaded and recorded", body = ImageResponse),
        (status = 400, description = "Invalid payload encoding or content type", body = ErrorResponse),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse),
        (status = 500, description = "Image service failure, or metadata not saved after upload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(
        operation = "create_image",
        caller = %caller.display_name(),
        content_type = %request.content_type
    )
)]
pub async fn create_image(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ValidatedJson(request): ValidatedJson<CreateImageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.records.create(request).await?;
    let location = format!("/images/{}", record.img_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record.to_public_view()),
    ))
}

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image id assigned by the image service")),
    responses(
        (status = 200, description = "Image record", body = ImageResponse),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(operation = "get_image", image_id = %image.img_id, caller = %caller.display_name())
)]
pub async fn get_image(caller: Caller, ResolvedImage(image): ResolvedImage) -> Json<ImageResponse> {
    Json(image.to_public_view())
}

#[utoipa::path(
    put,
    path = "/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image id assigned by the image service")),
    request_body = ReplaceImageRequest,
    responses(
        (status = 204, description = "Metadata replaced"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(operation = "replace_image", image_id = %image.img_id, caller = %caller.display_name())
)]
pub async fn replace_image(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ResolvedImage(image): ResolvedImage,
    ValidatedJson(request): ValidatedJson<ReplaceImageRequest>,
) -> Result<StatusCode, HttpAppError> {
    state.records.replace(&image, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image id assigned by the image service")),
    request_body = ModifyImageRequest,
    responses(
        (status = 204, description = "Metadata updated"),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(operation = "modify_image", image_id = %image.img_id, caller = %caller.display_name())
)]
pub async fn modify_image(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ResolvedImage(image): ResolvedImage,
    ValidatedJson(request): ValidatedJson<ModifyImageRequest>,
) -> Result<StatusCode, HttpAppError> {
    state.records.modify(&image, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image id assigned by the image service")),
    responses(
        (status = 204, description = "Image deleted remotely and locally"),
        (status = 401, description = "Missing or malformed bearer token", body = ErrorResponse),
        (status = 403, description = "Token failed verification", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Image service failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip_all,
    fields(operation = "delete_image", image_id = %image.img_id, caller = %caller.display_name())
)]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ResolvedImage(image): ResolvedImage,
) -> Result<StatusCode, HttpAppError> {
    state.records.delete(image).await?;
    Ok(StatusCode::NO_CONTENT)
}
