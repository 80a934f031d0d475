//! Service-level flows across mutation, query and statistics

use chrono::Duration;
use serde_json::json;
use taskboard::database::TaskStore;
use taskboard::models::TaskPriority;
use taskboard::query_builder::{Predicate, TaskListParams};

use crate::common::builders::TaskBuilder;
use crate::common::{fixed_now, TestContext};

fn overdue_params() -> TaskListParams {
    TaskListParams {
        overdue: Some("true".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_completion_toggle_sets_and_clears_completed_at() {
    let ctx = TestContext::new();
    let tasks = ctx.state.tasks();
    let created = tasks.create(json!({ "title": "Renew certificates" })).await.unwrap();
    let id = created.task.id;

    ctx.clock.advance(Duration::minutes(5));
    let done = tasks.update(id, json!({ "isCompleted": true })).await.unwrap();
    assert_eq!(done.task.completed_at, Some(fixed_now() + Duration::minutes(5)));
    assert_eq!(done.progress_percentage, 100);

    let reopened = tasks.update(id, json!({ "isCompleted": false })).await.unwrap();
    assert_eq!(reopened.task.completed_at, None);

    let fields: Vec<&str> = reopened
        .task
        .history
        .iter()
        .map(|h| h.field.as_str())
        .collect();
    assert!(fields.contains(&"isCompleted"));
}

#[tokio::test]
async fn test_completing_removes_task_from_overdue_list() {
    let late = TaskBuilder::new("File taxes")
        .due(fixed_now() - Duration::days(1))
        .build();
    let id = late.id;
    let ctx = TestContext::seeded(vec![late, TaskBuilder::new("Someday").build()]);

    let page = ctx.state.queries().list(&overdue_params()).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].task.id, id);
    assert!(page.data[0].is_overdue);

    ctx.state.tasks().complete(id).await.unwrap();

    let page = ctx.state.queries().list(&overdue_params()).await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_items, 0);
}

#[tokio::test]
async fn test_statistics_agree_with_counts() {
    let mut seed = Vec::new();
    for i in 0..14 {
        let priority = TaskPriority::ALL[i % TaskPriority::ALL.len()];
        let mut builder = TaskBuilder::new(&format!("task {i}"))
            .priority(priority)
            .category(&format!("cat-{}", i % 12))
            .hours(2.0, 1.5);
        if i % 3 == 0 {
            builder = builder.completed();
        }
        seed.push(builder.build());
    }
    let ctx = TestContext::seeded(seed);

    let stats = ctx.state.statistics().compute().await.unwrap();
    let total = ctx.store.count(&Predicate::match_all()).await.unwrap();

    assert_eq!(stats.overview.total_tasks, total);
    assert_eq!(stats.overview.completed_tasks, 5);
    assert_eq!(
        stats.priority_breakdown.iter().map(|e| e.count).sum::<u64>(),
        total
    );
    assert!((stats.overview.total_estimated_hours - 28.0).abs() < f64::EPSILON);

    assert_eq!(stats.category_breakdown.len(), 10);
    assert!(stats
        .category_breakdown
        .windows(2)
        .all(|pair| pair[0].count >= pair[1].count));
    assert!(stats.project_breakdown.is_empty());
}

#[tokio::test]
async fn test_statistics_on_empty_collection() {
    let ctx = TestContext::new();
    let stats = ctx.state.statistics().compute().await.unwrap();
    assert_eq!(stats.overview.total_tasks, 0);
    assert!(stats.priority_breakdown.is_empty());
    assert!(stats.category_breakdown.is_empty());
}

#[tokio::test]
async fn test_template_round_trip() {
    let ctx = TestContext::new();
    let template = ctx
        .state
        .tasks()
        .create_template(json!({
            "title": "Weekly report",
            "priority": "high",
            "tags": ["report"],
            "templateName": "weekly",
        }))
        .await
        .unwrap();

    let task = ctx
        .state
        .tasks()
        .create_from_template(json!({
            "templateId": template.task.id.to_string(),
            "customizations": { "title": "Week 11 report" },
        }))
        .await
        .unwrap();

    assert_eq!(task.task.title, "Week 11 report");
    assert_eq!(task.task.priority, TaskPriority::High);
    assert_eq!(task.task.tags, vec!["report".to_string()]);
    assert!(!task.task.is_template);

    let templates = ctx.state.tasks().list_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["templateName"], "weekly");
}
