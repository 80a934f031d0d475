//! # Health Check Handlers
//!
//! `/health` answers as long as the process is up; `/health/ready` also
//! round-trips to the task store.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{debug, warn};

use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub timestamp: String,
}

/// Basic health check: GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success",
        message: "Taskboard API is running",
        timestamp: state.clock().now().to_rfc3339(),
    })
}

/// Readiness probe: GET /health/ready
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ReadinessResponse>> {
    debug!("Performing readiness probe");
    let backend = state.store().backend_name();

    if let Err(e) = state.store().health_check().await {
        warn!(backend, error = %e, "Task store is not ready");
        return Err(ApiError::ServiceUnavailable {
            reason: e.to_string(),
        });
    }

    Ok(Json(ReadinessResponse {
        status: "ready",
        backend,
        timestamp: state.clock().now().to_rfc3339(),
    }))
}
