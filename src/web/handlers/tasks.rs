//! # Task Handlers
//!
//! CRUD, completion, comments, attachments, bulk operations, search and export
//! under `/api/tasks`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::TaskView;
use crate::query_builder::{AdvancedSearchParams, ExportParams, TaskListParams};
use crate::services::ExportOutput;
use crate::validation::{
    validate_export_params, validate_list_params, validate_search_params, validate_task_id,
};
use crate::web::response_types::{
    ApiResult, CollectionEnvelope, DataEnvelope, MessageEnvelope, OrFail, PageEnvelope,
};
use crate::web::state::AppState;

type JsonBody = Result<Json<Value>, JsonRejection>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;

/// List tasks: GET /api/tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    query: QueryParams<TaskListParams>,
) -> ApiResult<Json<PageEnvelope<TaskView>>> {
    let Query(params) = query?;
    validate_list_params(&params, state.pagination.max_limit).or_fail("Failed to fetch tasks")?;
    let page = state
        .queries()
        .list(&params)
        .await
        .or_fail("Failed to fetch tasks")?;
    Ok(Json(PageEnvelope::new(page.pagination, page.data)))
}

/// Get one task: GET /api/tasks/:id
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataEnvelope<TaskView>>> {
    let id = validate_task_id(&id).or_fail("Failed to fetch task")?;
    let task = state.tasks().get(id).await.or_fail("Failed to fetch task")?;
    Ok(Json(DataEnvelope::new(task)))
}

/// Create a task: POST /api/tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<DataEnvelope<TaskView>>)> {
    let Json(body) = body?;
    let task = state
        .tasks()
        .create(body)
        .await
        .or_fail("Failed to create task")?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::with_message("Task created successfully", task)),
    ))
}

/// Update a task: PUT/PATCH /api/tasks/:id
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<DataEnvelope<TaskView>>> {
    let id = validate_task_id(&id).or_fail("Failed to update task")?;
    let Json(body) = body?;
    let task = state
        .tasks()
        .update(id, body)
        .await
        .or_fail("Failed to update task")?;
    Ok(Json(DataEnvelope::with_message("Task updated successfully", task)))
}

/// Delete a task: DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageEnvelope>> {
    let id = validate_task_id(&id).or_fail("Failed to delete task")?;
    state
        .tasks()
        .delete(id)
        .await
        .or_fail("Failed to delete task")?;
    Ok(Json(MessageEnvelope::new("Task deleted successfully")))
}

/// Mark a task completed: PATCH /api/tasks/:id/complete
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataEnvelope<TaskView>>> {
    let id = validate_task_id(&id).or_fail("Failed to complete task")?;
    let task = state
        .tasks()
        .complete(id)
        .await
        .or_fail("Failed to complete task")?;
    Ok(Json(DataEnvelope::with_message("Task marked as completed", task)))
}

/// Append a comment: POST /api/tasks/:id/comments
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<DataEnvelope<TaskView>>> {
    let id = validate_task_id(&id).or_fail("Failed to add comment")?;
    let Json(body) = body?;
    let task = state
        .tasks()
        .add_comment(id, body)
        .await
        .or_fail("Failed to add comment")?;
    Ok(Json(DataEnvelope::with_message("Comment added successfully", task)))
}

/// Append an attachment: POST /api/tasks/:id/attachments
pub async fn add_attachment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<DataEnvelope<TaskView>>> {
    let id = validate_task_id(&id).or_fail("Failed to add attachment")?;
    let Json(body) = body?;
    let task = state
        .tasks()
        .add_attachment(id, body)
        .await
        .or_fail("Failed to add attachment")?;
    Ok(Json(DataEnvelope::with_message(
        "Attachment added successfully",
        task,
    )))
}

/// Bulk create: POST /api/tasks/bulk
pub async fn bulk_create(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = body?;
    let outcome = state
        .tasks()
        .bulk_create(body)
        .await
        .or_fail("Failed to create tasks")?;
    let created = outcome.created.len();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("{created} tasks created successfully"),
            "createdCount": created,
            "failed": outcome.failed,
            "data": outcome.created,
        })),
    ))
}

/// Bulk update: PATCH /api/tasks/bulk
pub async fn bulk_update(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let outcome = state
        .tasks()
        .bulk_update(body)
        .await
        .or_fail("Failed to update tasks")?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("{} tasks updated successfully", outcome.modified_count),
        "data": outcome,
    })))
}

/// Bulk delete: DELETE /api/tasks/bulk
pub async fn bulk_delete(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let deleted = state
        .tasks()
        .bulk_delete(body)
        .await
        .or_fail("Failed to delete tasks")?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("{deleted} tasks deleted successfully"),
        "data": { "deletedCount": deleted },
    })))
}

/// Advanced search: GET /api/tasks/search
pub async fn search_tasks(
    State(state): State<Arc<AppState>>,
    query: QueryParams<AdvancedSearchParams>,
) -> ApiResult<Json<CollectionEnvelope<TaskView>>> {
    let Query(params) = query?;
    validate_search_params(&params).or_fail("Failed to perform advanced search")?;
    let tasks = state
        .queries()
        .search(&params)
        .await
        .or_fail("Failed to perform advanced search")?;
    Ok(Json(CollectionEnvelope::new(tasks)))
}

/// Export: GET /api/tasks/export?format=json|csv
pub async fn export_tasks(
    State(state): State<Arc<AppState>>,
    query: QueryParams<ExportParams>,
) -> ApiResult<Response> {
    let Query(params) = query?;
    validate_export_params(&params).or_fail("Failed to export tasks")?;
    let output = state
        .queries()
        .export(&params)
        .await
        .or_fail("Failed to export tasks")?;

    let response = match output {
        ExportOutput::Csv(csv) => {
            debug!(bytes = csv.len(), "Sending CSV export");
            (
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=tasks.csv"),
                ],
                csv,
            )
                .into_response()
        }
        ExportOutput::Json(rows) => Json(CollectionEnvelope::new(rows)).into_response(),
    };
    Ok(response)
}
