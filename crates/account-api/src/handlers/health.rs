//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use account_service::dto::{HealthResponse, ReadinessResponse};
use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Process is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.service_context().clock().now()))
}

/// Readiness check with dependency health
///
/// GET /health/ready
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = ReadinessResponse),
        (status = 503, description = "Store unreachable", body = ReadinessResponse),
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let db_healthy = match ctx.database().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness probe: database unavailable");
            false
        }
    };

    let response = ReadinessResponse::ready(db_healthy, ctx.clock().now());
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
