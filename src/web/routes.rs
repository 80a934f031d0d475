//! # Web API Routes
//!
//! Route definitions grouped by resource. Static segments under `/api/tasks`
//! (`stats`, `search`, `export`, `templates`, `from-template`, `bulk`) take
//! precedence over the `/:id` capture.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::web::{handlers, state::AppState};

/// Liveness and readiness checks
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}

/// Collection-level task routes
pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route("/api/tasks/stats", get(handlers::stats::task_stats))
        .route("/api/tasks/search", get(handlers::tasks::search_tasks))
        .route("/api/tasks/export", get(handlers::tasks::export_tasks))
        .route(
            "/api/tasks/bulk",
            post(handlers::tasks::bulk_create)
                .patch(handlers::tasks::bulk_update)
                .delete(handlers::tasks::bulk_delete),
        )
}

/// Template routes
pub fn template_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tasks/templates",
            get(handlers::templates::list_templates).post(handlers::templates::create_template),
        )
        .route(
            "/api/tasks/from-template",
            post(handlers::templates::create_from_template),
        )
}

/// Routes addressing a single task by id
pub fn task_item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tasks/:id",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/api/tasks/:id/complete",
            patch(handlers::tasks::complete_task),
        )
        .route(
            "/api/tasks/:id/comments",
            post(handlers::tasks::add_comment),
        )
        .route(
            "/api/tasks/:id/attachments",
            post(handlers::tasks::add_attachment),
        )
}
