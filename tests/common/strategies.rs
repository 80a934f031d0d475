//! Proptest strategies for tasks and query parameters

use proptest::prelude::*;
use taskboard::models::{Task, TaskPriority, TaskStatus};
use taskboard::query_builder::TaskListParams;

use super::builders::TaskBuilder;

pub fn priority_strategy() -> impl Strategy<Value = TaskPriority> {
    prop::sample::select(TaskPriority::ALL.to_vec())
}

pub fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

/// Small vocabularies so generated filters actually hit generated tasks
pub fn label_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["ops", "docs", "infra", "web", "mobile", "data"])
        .prop_map(str::to_string)
}

pub fn task_strategy() -> impl Strategy<Value = Task> {
    (
        "[a-z]{1,12}",
        priority_strategy(),
        status_strategy(),
        prop::option::of(label_strategy()),
        prop::option::of(label_strategy()),
        prop::collection::vec(label_strategy(), 0..3),
        any::<bool>(),
        0i64..10_000,
    )
        .prop_map(
            |(title, priority, status, category, project, tags, completed, age)| {
                let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
                let mut builder = TaskBuilder::new(&title)
                    .priority(priority)
                    .status(status)
                    .tags(&tags)
                    .created_minutes_ago(age);
                if let Some(category) = &category {
                    builder = builder.category(category);
                }
                if let Some(project) = &project {
                    builder = builder.project(project);
                }
                if completed {
                    builder = builder.completed();
                }
                builder.build()
            },
        )
}

pub fn tasks_strategy(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(task_strategy(), 0..max)
}

/// Filter-only list parameters (no paging or sorting)
pub fn list_filter_strategy() -> impl Strategy<Value = TaskListParams> {
    (
        prop::option::of(status_strategy().prop_map(|s| s.as_str().to_string())),
        prop::option::of(priority_strategy().prop_map(|p| p.as_str().to_string())),
        prop::option::of(label_strategy()),
        prop::option::of(label_strategy()),
        prop::option::of(prop::sample::select(vec!["true", "false"]).prop_map(str::to_string)),
        prop::option::of("[a-z]{1,3}"),
        prop::option::of(label_strategy()),
    )
        .prop_map(
            |(status, priority, category, project, is_completed, search, tags)| TaskListParams {
                status,
                priority,
                category,
                project,
                is_completed,
                search,
                tags,
                ..Default::default()
            },
        )
}
