//! Error envelopes: validation, missing resources and unknown routes

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::{app, get, send};
use crate::common::TestContext;

#[tokio::test]
async fn test_unknown_route_is_404_with_path() {
    let ctx = TestContext::new();
    let response = get(app(&ctx), "/api/nothing-here?x=1").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({ "status": "error", "message": "Route /api/nothing-here?x=1 not found" })
    );
}

#[tokio::test]
async fn test_missing_task_is_404() {
    let ctx = TestContext::new();
    let response = get(app(&ctx), &format!("/api/tasks/{}", Uuid::now_v7())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["message"], "Task not found");
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let ctx = TestContext::new();
    let response = get(app(&ctx), "/api/tasks/not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "id");
}

#[tokio::test]
async fn test_create_validation_lists_field_errors() {
    let ctx = TestContext::new();
    let response = send(
        app(&ctx),
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "", "priority": "critical", "dueDate": "2020-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let body = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"priority"));
    assert!(fields.contains(&"dueDate"));
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let ctx = TestContext::new();
    let response = super::send_raw(app(&ctx), "/api/tasks", "{ not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "body");
}

#[tokio::test]
async fn test_undecodable_query_is_validation_error() {
    let ctx = TestContext::new();

    for uri in [
        "/api/tasks?status=pending&status=completed",
        "/api/tasks/search?priority=low&priority=high",
        "/api/tasks/export?format=csv&format=json",
    ] {
        let response = get(app(&ctx), uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json")));
        let body = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "query");
    }
}

#[tokio::test]
async fn test_list_query_validation() {
    let ctx = TestContext::new();

    let response = get(app(&ctx), "/api/tasks?limit=500").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "limit");

    let response = get(app(&ctx), "/api/tasks?sortBy=colour").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "sortBy");

    // Blank values count as absent
    let response = get(app(&ctx), "/api/tasks?status=&isCompleted=").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_export_rejects_unknown_format() {
    let ctx = TestContext::new();
    let response = get(app(&ctx), "/api/tasks/export?format=xml").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["message"], "Format must be json or csv");
}

#[tokio::test]
async fn test_from_unknown_template_is_404() {
    let ctx = TestContext::new();
    let response = send(
        app(&ctx),
        Method::POST,
        "/api/tasks/from-template",
        Some(json!({ "templateId": Uuid::now_v7() })),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["message"], "Template not found");
}

#[tokio::test]
async fn test_bulk_delete_requires_ids() {
    let ctx = TestContext::new();
    let response = send(
        app(&ctx),
        Method::DELETE,
        "/api/tasks/bulk",
        Some(json!({ "taskIds": [] })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "taskIds");
}
