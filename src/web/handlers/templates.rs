//! # Template Handlers
//!
//! Templates are tasks with `isTemplate` set; new tasks can be instantiated
//! from them with per-field customizations.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::models::TaskView;
use crate::web::response_types::{ApiResult, CollectionEnvelope, DataEnvelope, OrFail};
use crate::web::state::AppState;

/// List templates: GET /api/tasks/templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CollectionEnvelope<Value>>> {
    let templates = state
        .tasks()
        .list_templates()
        .await
        .or_fail("Failed to fetch templates")?;
    Ok(Json(CollectionEnvelope::new(templates)))
}

/// Create a template: POST /api/tasks/templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataEnvelope<TaskView>>)> {
    let Json(body) = body?;
    let template = state
        .tasks()
        .create_template(body)
        .await
        .or_fail("Failed to create template")?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::with_message(
            "Task template created successfully",
            template,
        )),
    ))
}

/// Instantiate a template: POST /api/tasks/from-template
pub async fn create_from_template(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataEnvelope<TaskView>>)> {
    let Json(body) = body?;
    let task = state
        .tasks()
        .create_from_template(body)
        .await
        .or_fail("Failed to create task from template")?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::with_message(
            "Task created from template successfully",
            task,
        )),
    ))
}
