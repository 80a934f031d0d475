use chrono::Duration;
use taskboard::models::{Task, TaskPriority, TaskStatus};
use taskboard::query_builder::{
    advanced_search_predicate, export_predicate, list_predicate, AdvancedSearchParams,
    ExportParams, Predicate, SortDirection, SortField, SortSpec, TaskListParams,
};

use crate::common::builders::TaskBuilder;
use crate::common::fixed_now;

fn matching<'a>(predicate: &Predicate, tasks: &'a [Task]) -> Vec<&'a str> {
    tasks
        .iter()
        .filter(|t| predicate.matches(t))
        .map(|t| t.title.as_str())
        .collect()
}

fn catalogue() -> Vec<Task> {
    vec![
        TaskBuilder::new("Write release notes")
            .priority(TaskPriority::High)
            .category("docs")
            .tags(&["release", "writing"])
            .build(),
        TaskBuilder::new("Fix login bug")
            .priority(TaskPriority::Urgent)
            .status(TaskStatus::InProgress)
            .assignee("Dana")
            .tags(&["bug"])
            .build(),
        TaskBuilder::new("Plan sprint")
            .description("Groom the BACKLOG first")
            .project("apollo")
            .build(),
        TaskBuilder::new("Archive logs").completed().build(),
    ]
}

#[test]
fn test_no_inputs_match_everything() {
    let tasks = catalogue();
    let predicate = list_predicate(&TaskListParams::default(), fixed_now());
    assert!(predicate.is_empty());
    assert_eq!(matching(&predicate, &tasks).len(), tasks.len());
}

#[test]
fn test_exact_filters_combine_with_and() {
    let tasks = catalogue();
    let params = TaskListParams {
        priority: Some("urgent".to_string()),
        status: Some("in-progress".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&params, fixed_now()), &tasks),
        vec!["Fix login bug"]
    );

    let params = TaskListParams {
        priority: Some("urgent".to_string()),
        status: Some("pending".to_string()),
        ..Default::default()
    };
    assert!(matching(&list_predicate(&params, fixed_now()), &tasks).is_empty());
}

#[test]
fn test_search_is_case_insensitive_across_fields() {
    let tasks = catalogue();
    let by_description = TaskListParams {
        search: Some("backlog".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&by_description, fixed_now()), &tasks),
        vec!["Plan sprint"]
    );

    let by_assignee = TaskListParams {
        search: Some("DANA".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&by_assignee, fixed_now()), &tasks),
        vec!["Fix login bug"]
    );
}

#[test]
fn test_search_treats_pattern_characters_literally() {
    let tasks = vec![
        TaskBuilder::new("Budget (draft)").build(),
        TaskBuilder::new("Budget draft").build(),
    ];
    let params = TaskListParams {
        search: Some("(draft".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&params, fixed_now()), &tasks),
        vec!["Budget (draft)"]
    );
}

#[test]
fn test_tags_match_any() {
    let tasks = catalogue();
    let params = TaskListParams {
        tags: Some("bug,release".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&params, fixed_now()), &tasks),
        vec!["Write release notes", "Fix login bug"]
    );
}

#[test]
fn test_completion_flag_is_coerced() {
    let tasks = catalogue();
    let params = TaskListParams {
        is_completed: Some("true".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&list_predicate(&params, fixed_now()), &tasks),
        vec!["Archive logs"]
    );

    let params = TaskListParams {
        is_completed: Some("false".to_string()),
        ..Default::default()
    };
    assert_eq!(matching(&list_predicate(&params, fixed_now()), &tasks).len(), 3);
}

#[test]
fn test_overdue_excludes_completed_and_future() {
    let now = fixed_now();
    let tasks = vec![
        TaskBuilder::new("late").due(now - Duration::days(1)).build(),
        TaskBuilder::new("late but done")
            .due(now - Duration::days(1))
            .completed()
            .build(),
        TaskBuilder::new("upcoming").due(now + Duration::days(1)).build(),
        TaskBuilder::new("no due date").build(),
    ];
    let params = TaskListParams {
        overdue: Some("true".to_string()),
        ..Default::default()
    };
    assert_eq!(matching(&list_predicate(&params, now), &tasks), vec!["late"]);
}

#[test]
fn test_advanced_search_date_range_and_flags() {
    let mut with_comment = TaskBuilder::new("discussed").created_minutes_ago(60 * 24 * 3).build();
    with_comment.comments.push(taskboard::models::Comment {
        content: "looks good".to_string(),
        author: "Ravi".to_string(),
        created_at: fixed_now(),
    });
    let tasks = vec![
        with_comment,
        TaskBuilder::new("quiet").created_minutes_ago(60 * 24 * 3).build(),
        TaskBuilder::new("ancient").created_minutes_ago(60 * 24 * 30).build(),
    ];

    let params = AdvancedSearchParams {
        date_from: Some("2025-03-01".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&advanced_search_predicate(&params), &tasks),
        vec!["discussed", "quiet"]
    );

    let params = AdvancedSearchParams {
        has_comments: Some("true".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&advanced_search_predicate(&params), &tasks),
        vec!["discussed"]
    );
}

#[test]
fn test_export_ignores_unsupported_filters() {
    let tasks = catalogue();
    let params = ExportParams {
        category: Some("docs".to_string()),
        ..Default::default()
    };
    assert_eq!(
        matching(&export_predicate(&params), &tasks),
        vec!["Write release notes"]
    );
}

#[test]
fn test_priority_sorts_as_text() {
    let mut tasks = vec![
        TaskBuilder::new("high").priority(TaskPriority::High).build(),
        TaskBuilder::new("medium").priority(TaskPriority::Medium).build(),
        TaskBuilder::new("low").priority(TaskPriority::Low).build(),
    ];
    SortSpec::new(SortField::Priority, SortDirection::Desc).sort(&mut tasks);
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["medium", "low", "high"]);
}

#[test]
fn test_default_sort_is_newest_first() {
    let spec = SortSpec::from_params(None, None);
    assert_eq!(spec.field, SortField::CreatedAt);
    assert_eq!(spec.direction, SortDirection::Desc);

    let ascending = SortSpec::from_params(Some("title"), None);
    assert_eq!(ascending.field, SortField::Title);
    assert_eq!(ascending.direction, SortDirection::Asc);
}
