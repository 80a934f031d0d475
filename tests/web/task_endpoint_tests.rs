//! Task, template and statistics endpoints

use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};
use taskboard::models::TaskPriority;

use super::{app, get, send};
use crate::common::builders::TaskBuilder;
use crate::common::{fixed_now, TestContext};

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|t| t["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new();
    let response = get(app(&ctx), "/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "success");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));

    let ready = get(app(&ctx), "/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.json()["backend"], "memory");
}

#[tokio::test]
async fn test_priority_filter_and_text_sort() {
    let ctx = TestContext::new();
    for (title, priority) in [("alpha", "high"), ("bravo", "medium"), ("charlie", "low")] {
        let response = send(
            app(&ctx),
            Method::POST,
            "/api/tasks",
            Some(json!({ "title": title, "priority": priority })),
        )
        .await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.json()["message"], "Task created successfully");
    }

    let filtered = get(app(&ctx), "/api/tasks?priority=high").await.json();
    assert_eq!(filtered["results"], 1);
    assert_eq!(titles(&filtered), vec!["alpha"]);

    // Priorities compare as text, not by severity
    let sorted = get(app(&ctx), "/api/tasks?sortBy=priority&sortOrder=desc")
        .await
        .json();
    assert_eq!(sorted["results"], 3);
    assert_eq!(titles(&sorted), vec!["bravo", "charlie", "alpha"]);
}

#[tokio::test]
async fn test_overdue_filter_follows_completion() {
    let late = TaskBuilder::new("Pay invoice")
        .due(fixed_now() - Duration::days(1))
        .build();
    let id = late.id;
    let ctx = TestContext::seeded(vec![late, TaskBuilder::new("Not due").build()]);

    let before = get(app(&ctx), "/api/tasks?overdue=true").await.json();
    assert_eq!(titles(&before), vec!["Pay invoice"]);
    assert_eq!(before["data"][0]["isOverdue"], true);

    let completed = send(
        app(&ctx),
        Method::PATCH,
        &format!("/api/tasks/{id}/complete"),
        None,
    )
    .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.json()["data"]["isCompleted"], true);

    let after = get(app(&ctx), "/api/tasks?overdue=true").await.json();
    assert_eq!(after["results"], 0);
    assert_eq!(after["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn test_list_pagination_envelope() {
    let seed = (0..25)
        .map(|i| {
            TaskBuilder::new(&format!("task {i:02}"))
                .created_minutes_ago(100 - i)
                .build()
        })
        .collect();
    let ctx = TestContext::seeded(seed);

    let body = get(app(&ctx), "/api/tasks?page=3&limit=10").await.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 5);
    assert_eq!(
        body["pagination"],
        json!({
            "currentPage": 3,
            "totalPages": 3,
            "totalItems": 25,
            "hasNextPage": false,
            "hasPrevPage": true,
        })
    );
    // Newest first: the last page holds the oldest five
    assert_eq!(titles(&body)[4], "task 00");
}

#[tokio::test]
async fn test_update_records_history() {
    let task = TaskBuilder::new("Draft").build();
    let id = task.id;
    let ctx = TestContext::seeded(vec![task]);

    let response = send(
        app(&ctx),
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({ "title": "Final", "status": "in-progress" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.json()["data"];
    assert_eq!(data["title"], "Final");
    assert_eq!(data["progressPercentage"], 50);
    let fields: Vec<&str> = data["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["status", "title"]);
}

#[tokio::test]
async fn test_comments_and_attachments() {
    let task = TaskBuilder::new("Review PR").build();
    let id = task.id;
    let ctx = TestContext::seeded(vec![task]);

    let comment = send(
        app(&ctx),
        Method::POST,
        &format!("/api/tasks/{id}/comments"),
        Some(json!({ "content": "LGTM", "author": "Mei" })),
    )
    .await;
    assert_eq!(comment.status, StatusCode::OK);
    assert_eq!(comment.json()["data"]["comments"][0]["content"], "LGTM");

    let attachment = send(
        app(&ctx),
        Method::POST,
        &format!("/api/tasks/{id}/attachments"),
        Some(json!({
            "filename": "diff.patch",
            "originalName": "diff.patch",
            "mimeType": "text/plain",
            "size": 2048,
            "url": "https://files.example.com/diff.patch",
        })),
    )
    .await;
    assert_eq!(attachment.status, StatusCode::OK);

    let search = get(app(&ctx), "/api/tasks/search?hasAttachments=true&hasComments=true")
        .await
        .json();
    assert_eq!(titles(&search), vec!["Review PR"]);
}

#[tokio::test]
async fn test_bulk_operations() {
    let ctx = TestContext::new();
    let created = send(
        app(&ctx),
        Method::POST,
        "/api/tasks/bulk",
        Some(json!({ "tasks": [
            { "title": "one", "priority": "low" },
            { "title": "" },
            { "title": "three", "priority": "low" },
        ]})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json();
    assert_eq!(body["createdCount"], 2);
    assert_eq!(body["failed"][0]["index"], 1);

    let ids: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();

    let updated = send(
        app(&ctx),
        Method::PATCH,
        "/api/tasks/bulk",
        Some(json!({ "taskIds": ids, "updates": { "priority": "urgent" } })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["data"]["modifiedCount"], 2);

    let urgent = get(app(&ctx), "/api/tasks?priority=urgent").await.json();
    assert_eq!(urgent["results"], 2);

    let deleted = send(
        app(&ctx),
        Method::DELETE,
        "/api/tasks/bulk",
        Some(json!({ "taskIds": ids })),
    )
    .await;
    assert_eq!(deleted.json()["data"]["deletedCount"], 2);
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_csv_export() {
    let ctx = TestContext::seeded(vec![
        TaskBuilder::new("Say \"hi\"").created_minutes_ago(2).build(),
        TaskBuilder::new("plain").created_minutes_ago(1).build(),
    ]);

    let response = get(app(&ctx), "/api/tasks/export?format=csv").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("text/csv"));
    assert_eq!(
        response.content_disposition.as_deref(),
        Some("attachment; filename=tasks.csv")
    );

    let csv = response.text();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,title,description"));
    assert!(lines[1].contains("\"Say \"\"hi\"\"\""));
}

#[tokio::test]
async fn test_json_export_omits_history() {
    let ctx = TestContext::seeded(vec![TaskBuilder::new("Ship").category("ops").build()]);
    let body = get(app(&ctx), "/api/tasks/export?category=ops").await.json();
    assert_eq!(body["results"], 1);
    assert!(body["data"][0].get("history").is_none());
}

#[tokio::test]
async fn test_statistics_endpoint() {
    let ctx = TestContext::seeded(vec![
        TaskBuilder::new("a").priority(TaskPriority::High).project("apollo").build(),
        TaskBuilder::new("b").priority(TaskPriority::High).project("apollo").build(),
        TaskBuilder::new("c").project("zeus").completed().build(),
    ]);

    let response = get(app(&ctx), "/api/tasks/stats").await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.json()["data"];
    assert_eq!(data["overview"]["totalTasks"], 3);
    assert_eq!(data["overview"]["completedTasks"], 1);
    assert_eq!(
        data["projectBreakdown"],
        json!([{ "_id": "apollo", "count": 2 }, { "_id": "zeus", "count": 1 }])
    );
}

#[tokio::test]
async fn test_templates_endpoints() {
    let template = TaskBuilder::new("Onboarding").template("onboarding").build();
    let template_id = template.id;
    let ctx = TestContext::seeded(vec![template]);

    let listed = get(app(&ctx), "/api/tasks/templates").await.json();
    assert_eq!(listed["results"], 1);
    assert!(listed["data"][0].get("comments").is_none());

    let created = send(
        app(&ctx),
        Method::POST,
        "/api/tasks/from-template",
        Some(json!({
            "templateId": template_id,
            "customizations": { "assignee": "Noor" },
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let data = &created.json()["data"];
    assert_eq!(data["title"], "Onboarding");
    assert_eq!(data["assignee"], "Noor");
    assert_eq!(data["isTemplate"], false);
}
