use axum::{Json, extract::State, http::StatusCode};

use super::model::{HealthResponse, LivenessResponse, ReadinessResponse};
use crate::state::AppState;

/// Liveness probe
///
/// Answers 200 as long as the process serves requests.
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is alive", body = LivenessResponse)),
    tag = "Health"
)]
pub async fn live(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(state.health.live())
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Database reachable", body = ReadinessResponse),
        (status = 503, description = "Database unreachable", body = ReadinessResponse)
    ),
    tag = "Health"
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let report = state.health.ready().await;
    let status = if report.error.is_none() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Detailed health report
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All checks passed", body = HealthResponse),
        (status = 503, description = "Degraded", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.health.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
