//! Liveness and readiness probes

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_store: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is running", body = HealthResponse))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "alive".to_string(),
            metadata_store: None,
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Metadata store reachable", body = HealthResponse),
        (status = 503, description = "Metadata store unavailable", body = HealthResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (ready, store_status) = match tokio::time::timeout(READINESS_TIMEOUT, state.store.ping()).await
    {
        Ok(Ok(())) => (true, "ready".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Metadata store readiness check failed");
            (false, "not_ready".to_string())
        }
        Err(_) => {
            tracing::error!("Metadata store readiness check timed out");
            (false, "timeout".to_string())
        }
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            metadata_store: Some(store_status),
        }),
    )
}
