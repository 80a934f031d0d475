//! PostgreSQL and in-memory stores must answer the same queries identically.
//!
//! Runs only when `DATABASE_URL` points at a reachable database; each test
//! works in its own table and drops it afterwards.

use std::env;
use std::sync::Arc;

use chrono::Duration;
use taskboard::config::{StorageBackend, StorageConfig, TaskboardConfig};
use taskboard::database::{MemoryTaskStore, PgTaskStore, TaskStore};
use taskboard::models::{Task, TaskPriority, TaskStatus, TaskView};
use taskboard::query_builder::{AdvancedSearchParams, TaskListParams};
use taskboard::utils::FixedClock;
use taskboard::web::AppState;
use uuid::Uuid;

use crate::common::builders::TaskBuilder;
use crate::common::fixed_now;

/// A store over a fresh table, with the table's name
async fn connect() -> Option<(PgTaskStore, String)> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL parity test");
        return None;
    };
    let table = format!("tasks_parity_{}", Uuid::now_v7().simple());
    let config = StorageConfig {
        backend: StorageBackend::Postgres,
        database_url: Some(url),
        table: table.clone(),
        ..StorageConfig::default()
    };
    Some((PgTaskStore::connect(&config).await.unwrap(), table))
}

async fn drop_table(store: &PgTaskStore, table: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(store.pool())
        .await
        .unwrap();
}

fn state(store: Arc<dyn TaskStore>) -> AppState {
    AppState::new(
        store,
        Arc::new(FixedClock::new(fixed_now())),
        &TaskboardConfig::default(),
    )
}

/// Distinct group sizes per category, project and priority keep breakdown
/// order unambiguous
fn seed() -> Vec<Task> {
    vec![
        TaskBuilder::new("Patch kernel")
            .created_minutes_ago(50)
            .priority(TaskPriority::High)
            .category("Ops")
            .project("Atlas")
            .hours(2.0, 1.0)
            .tags(&["infra"])
            .due(fixed_now() - Duration::days(1))
            .build(),
        TaskBuilder::new("Migrate queue")
            .created_minutes_ago(40)
            .priority(TaskPriority::High)
            .status(TaskStatus::InProgress)
            .category("Ops")
            .project("Atlas")
            .hours(4.0, 3.0)
            .tags(&["infra", "urgent"])
            .due(fixed_now() + Duration::days(2))
            .build(),
        TaskBuilder::new("Rotate keys")
            .created_minutes_ago(30)
            .priority(TaskPriority::High)
            .category("Ops")
            .project("Borealis")
            .hours(6.0, 6.0)
            .description("Rotate the signing keys")
            .completed()
            .build(),
        TaskBuilder::new("Write runbook")
            .created_minutes_ago(20)
            .priority(TaskPriority::Medium)
            .category("Docs")
            .project("Atlas")
            .assignee("sam")
            .build(),
        TaskBuilder::new("Proofread changelog")
            .created_minutes_ago(10)
            .priority(TaskPriority::Medium)
            .category("Docs")
            .completed()
            .build(),
        TaskBuilder::new("Release template")
            .created_minutes_ago(5)
            .priority(TaskPriority::Low)
            .project("Borealis")
            .template("release")
            .build(),
    ]
}

fn list(pairs: &[(&str, &str)]) -> TaskListParams {
    let mut params = TaskListParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "page" => params.page = value,
            "limit" => params.limit = value,
            "status" => params.status = value,
            "priority" => params.priority = value,
            "isCompleted" => params.is_completed = value,
            "isTemplate" => params.is_template = value,
            "overdue" => params.overdue = value,
            "search" => params.search = value,
            "tags" => params.tags = value,
            "sortBy" => params.sort_by = value,
            "sortOrder" => params.sort_order = value,
            other => panic!("unsupported list parameter {other}"),
        }
    }
    params
}

fn ids(views: &[TaskView]) -> Vec<Uuid> {
    views.iter().map(|v| v.task.id).collect()
}

#[tokio::test]
async fn test_list_and_search_match_memory_store() {
    let Some((pg, table)) = connect().await else {
        return;
    };
    let tasks = seed();
    pg.insert_many(tasks.clone()).await.unwrap();
    let memory = state(Arc::new(MemoryTaskStore::with_tasks(tasks)));
    let postgres = state(Arc::new(pg.clone()));

    let cases = [
        list(&[]),
        list(&[("status", "pending")]),
        list(&[("priority", "high"), ("sortBy", "title"), ("sortOrder", "asc")]),
        list(&[("isCompleted", "true")]),
        list(&[("isTemplate", "true")]),
        list(&[("overdue", "true")]),
        list(&[("search", "ROTATE")]),
        list(&[("tags", "infra,urgent")]),
        list(&[("page", "2"), ("limit", "2")]),
        list(&[("sortBy", "dueDate"), ("sortOrder", "asc")]),
    ];
    for params in &cases {
        let expected = memory.queries().list(params).await.unwrap();
        let actual = postgres.queries().list(params).await.unwrap();
        assert_eq!(ids(&actual.data), ids(&expected.data), "{params:?}");
        assert_eq!(actual.pagination, expected.pagination, "{params:?}");
    }

    let search = AdvancedSearchParams {
        query: Some("keys".to_string()),
        is_completed: Some("true".to_string()),
        ..Default::default()
    };
    let expected = memory.queries().search(&search).await.unwrap();
    let actual = postgres.queries().search(&search).await.unwrap();
    assert_eq!(actual.len(), 1);
    assert_eq!(ids(&actual), ids(&expected));

    drop_table(&pg, &table).await;
}

#[tokio::test]
async fn test_statistics_match_memory_store() {
    let Some((pg, table)) = connect().await else {
        return;
    };
    let tasks = seed();
    pg.insert_many(tasks.clone()).await.unwrap();
    let memory = state(Arc::new(MemoryTaskStore::with_tasks(tasks)));
    let postgres = state(Arc::new(pg.clone()));

    let expected = memory.statistics().compute().await.unwrap();
    let actual = postgres.statistics().compute().await.unwrap();
    assert_eq!(actual, expected);
    assert!(actual.overview.total_tasks > 0);

    drop_table(&pg, &table).await;
}
