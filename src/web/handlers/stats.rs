//! # Statistics Handler

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::services::TaskStatistics;
use crate::web::response_types::{ApiResult, DataEnvelope, OrFail};
use crate::web::state::AppState;

/// Overview and breakdowns: GET /api/tasks/stats
pub async fn task_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataEnvelope<TaskStatistics>>> {
    let stats = state
        .statistics()
        .compute()
        .await
        .or_fail("Failed to fetch task statistics")?;
    Ok(Json(DataEnvelope::new(stats)))
}
