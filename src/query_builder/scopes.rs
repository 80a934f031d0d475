//! # Task Scopes
//!
//! Turns the flat query parameters of the list, search and export endpoints
//! into a [`Predicate`].
//!
//! Every input is optional and independent. A blank or absent input adds no
//! clause. Boolean inputs arrive as the strings `"true"`/`"false"` and are
//! coerced here; anything other than `"true"` reads as `false`.
//!
//! The free-text search covers exactly five fields: title, description,
//! category, project and assignee.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::predicate::{Clause, Comparison, FieldValue, Predicate, TaskField};

/// Fields covered by free-text search
pub const SEARCH_FIELDS: [TaskField; 5] = [
    TaskField::Title,
    TaskField::Description,
    TaskField::Category,
    TaskField::Project,
    TaskField::Assignee,
];

/// Query parameters of `GET /api/tasks`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub is_completed: Option<String>,
    pub is_template: Option<String>,
    pub overdue: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Query parameters of `GET /api/tasks/search`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchParams {
    pub query: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub assignee: Option<String>,
    pub tags: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub is_completed: Option<String>,
    pub has_attachments: Option<String>,
    pub has_comments: Option<String>,
}

/// Query parameters of `GET /api/tasks/export`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub format: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub is_completed: Option<String>,
}

/// Trimmed value, or `None` when absent or blank
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_true(value: &str) -> bool {
    value == "true"
}

/// Parse a date parameter: RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC
pub fn parse_date_param(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Builder for task predicates, one method per kind of query input
#[derive(Debug, Clone, Default)]
pub struct TaskScope {
    predicate: Predicate,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on a text field
    pub fn with_text(mut self, field: TaskField, value: &Option<String>) -> Self {
        if let Some(value) = present(value) {
            self.predicate.push(Clause::Equals {
                field,
                value: FieldValue::text(value),
            });
        }
        self
    }

    /// Exact match on a boolean field given as `"true"`/`"false"`.
    ///
    /// Any non-blank value adds a clause; only `"true"` reads as true.
    pub fn with_flag(mut self, field: TaskField, value: &Option<String>) -> Self {
        if let Some(value) = present(value) {
            self.predicate.push(Clause::Equals {
                field,
                value: FieldValue::Bool(is_true(value)),
            });
        }
        self
    }

    /// Comma-separated tag list, matched with ANY semantics.
    ///
    /// Pieces are not trimmed or filtered, so `"a,"` also matches an empty tag.
    pub fn with_tags(mut self, tags: &Option<String>) -> Self {
        if let Some(tags) = present(tags) {
            self.predicate.push(Clause::AnyOf {
                field: TaskField::Tags,
                values: tags.split(',').map(str::to_string).collect(),
            });
        }
        self
    }

    /// Case-insensitive substring search across [`SEARCH_FIELDS`]
    pub fn with_search(mut self, needle: &Option<String>) -> Self {
        if let Some(needle) = present(needle) {
            self.predicate.push(Clause::TextSearch {
                fields: SEARCH_FIELDS.to_vec(),
                needle: needle.to_string(),
            });
        }
        self
    }

    /// Due date set and already passed, task not completed
    pub fn overdue(mut self, now: DateTime<Utc>) -> Self {
        self.predicate.push(Clause::Exists {
            field: TaskField::DueDate,
        });
        self.predicate.push(Clause::Compare {
            field: TaskField::DueDate,
            op: Comparison::Lt,
            value: FieldValue::Time(now),
        });
        self.predicate.push(Clause::Equals {
            field: TaskField::IsCompleted,
            value: FieldValue::Bool(false),
        });
        self
    }

    fn with_overdue_flag(self, flag: &Option<String>, now: DateTime<Utc>) -> Self {
        match present(flag) {
            Some(flag) if is_true(flag) => self.overdue(now),
            _ => self,
        }
    }

    /// Inclusive `createdAt` bounds; unparseable bounds are ignored
    pub fn created_between(mut self, from: &Option<String>, to: &Option<String>) -> Self {
        if let Some(from) = present(from).and_then(parse_date_param) {
            self.predicate.push(Clause::Compare {
                field: TaskField::CreatedAt,
                op: Comparison::Gte,
                value: FieldValue::Time(from),
            });
        }
        if let Some(to) = present(to).and_then(parse_date_param) {
            self.predicate.push(Clause::Compare {
                field: TaskField::CreatedAt,
                op: Comparison::Lte,
                value: FieldValue::Time(to),
            });
        }
        self
    }

    /// Require a non-empty list field when the flag is `"true"`
    pub fn with_non_empty(mut self, field: TaskField, flag: &Option<String>) -> Self {
        if present(flag).is_some_and(is_true) {
            self.predicate.push(Clause::NonEmpty { field });
        }
        self
    }

    /// Only templates
    pub fn templates(mut self) -> Self {
        self.predicate.push(Clause::Equals {
            field: TaskField::IsTemplate,
            value: FieldValue::Bool(true),
        });
        self
    }

    pub fn build(self) -> Predicate {
        self.predicate
    }
}

/// Predicate for the list endpoint
pub fn list_predicate(params: &TaskListParams, now: DateTime<Utc>) -> Predicate {
    TaskScope::new()
        .with_text(TaskField::Status, &params.status)
        .with_text(TaskField::Priority, &params.priority)
        .with_flag(TaskField::IsCompleted, &params.is_completed)
        .with_text(TaskField::Category, &params.category)
        .with_text(TaskField::Project, &params.project)
        .with_text(TaskField::Assignee, &params.assignee)
        .with_text(TaskField::Reporter, &params.reporter)
        .with_flag(TaskField::IsTemplate, &params.is_template)
        .with_search(&params.search)
        .with_tags(&params.tags)
        .with_overdue_flag(&params.overdue, now)
        .build()
}

/// Predicate for the advanced search endpoint
pub fn advanced_search_predicate(params: &AdvancedSearchParams) -> Predicate {
    TaskScope::new()
        .with_search(&params.query)
        .with_text(TaskField::Status, &params.status)
        .with_text(TaskField::Priority, &params.priority)
        .with_text(TaskField::Category, &params.category)
        .with_text(TaskField::Project, &params.project)
        .with_text(TaskField::Assignee, &params.assignee)
        .with_flag(TaskField::IsCompleted, &params.is_completed)
        .with_tags(&params.tags)
        .created_between(&params.date_from, &params.date_to)
        .with_non_empty(TaskField::Attachments, &params.has_attachments)
        .with_non_empty(TaskField::Comments, &params.has_comments)
        .build()
}

/// Predicate for the export endpoint: only five filters apply there
pub fn export_predicate(params: &ExportParams) -> Predicate {
    TaskScope::new()
        .with_text(TaskField::Status, &params.status)
        .with_text(TaskField::Priority, &params.priority)
        .with_text(TaskField::Category, &params.category)
        .with_text(TaskField::Project, &params.project)
        .with_flag(TaskField::IsCompleted, &params.is_completed)
        .build()
}
