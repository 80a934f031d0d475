//! CSV rendering for the export endpoint.
//!
//! Fixed column subset, every value double-quoted, rows joined by `\n`.
//! Embedded quotes are doubled; unset values render as `""`.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::Task;

pub const CSV_COLUMNS: [&str; 13] = [
    "id",
    "title",
    "description",
    "status",
    "priority",
    "category",
    "project",
    "dueDate",
    "assignee",
    "reporter",
    "isCompleted",
    "createdAt",
    "updatedAt",
];

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn row(task: &Task) -> String {
    let values = [
        task.id.to_string(),
        task.title.clone(),
        text(&task.description),
        task.status.as_str().to_string(),
        task.priority.as_str().to_string(),
        text(&task.category),
        text(&task.project),
        task.due_date.map(timestamp).unwrap_or_default(),
        text(&task.assignee),
        text(&task.reporter),
        task.is_completed.to_string(),
        timestamp(task.created_at),
        timestamp(task.updated_at),
    ];
    values
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header row plus one row per task. The header is written even for no tasks.
pub fn to_csv(tasks: &[Task]) -> String {
    std::iter::once(CSV_COLUMNS.join(","))
        .chain(tasks.iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}
