//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "version": "0.1.0"
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Body of `GET /ready`.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// The store answered
    pub ready: bool,
    /// Tickets currently stored
    pub tickets: usize,
}

/// Readiness check: the store is reachable and reports its size.
///
/// ```text
/// GET /ready
/// ```
#[allow(clippy::unused_async)]
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        ready: true,
        tickets: state.service.store().count(),
    })
}

/// Prometheus text exposition.
///
/// # Errors
///
/// 404 `NOT_FOUND` when the server runs without a metrics recorder.
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> WebResult<String> {
    state
        .metrics
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| AppError::not_found("metrics recorder is not installed"))
}
