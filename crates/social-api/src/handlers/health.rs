//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::extractors::AdminAuth;
use crate::state::AppState;

/// GET /v1/health
///
/// The cache is never the system of record, so an unreachable backend
/// degrades the report without failing the request.
pub async fn health(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Json<ApiResponse<HealthResponse>> {
    let (status, cache) = match state.cache.health_check().await {
        None => ("ok", "disabled"),
        Some(true) => ("ok", "ok"),
        Some(false) => ("degraded", "unavailable"),
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        env: state.config.server.env.clone(),
        cache: cache.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
