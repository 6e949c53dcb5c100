use crate::auth::jwt::TokenVerifier;
use crate::auth::models::Caller;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use imgmeta_core::AppError;
use std::sync::Arc;

/// Authenticate the caller before any other stage of an image route runs.
pub async fn auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value),
            Err(_) => {
                return HttpAppError(AppError::Unauthenticated(
                    "Invalid authorization header format".to_string(),
                ))
                .into_response();
            }
        },
    };

    let claims = match verifier.authenticate(authorization) {
        Ok(claims) => claims,
        Err(err) => return HttpAppError(err).into_response(),
    };

    let caller = Caller::from(claims);
    tracing::debug!(caller = %caller.display_name(), "Caller authenticated");
    request.extensions_mut().insert(caller);

    next.run(request).await
}
