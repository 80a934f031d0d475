//! Input validation for Taskboard
//!
//! Request bodies are checked as raw JSON before they are deserialized into
//! the typed payloads of [`crate::models`], so every field failure can be
//! reported at once with the offending value. Query parameters are checked
//! on their parsed string form.
//!
//! Blank query parameters count as absent, matching how the predicate
//! builders ignore them.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{FieldError, Result, TaskboardError};
use crate::models::{NewTask, TaskPriority, TaskStatus};
use crate::query_builder::scopes::{parse_date_param, present};
use crate::query_builder::{AdvancedSearchParams, ExportParams, SortField, TaskListParams};

const MAX_TITLE: usize = 100;
const MAX_DESCRIPTION: usize = 500;
const MAX_CATEGORY: usize = 50;
const MAX_NAME: usize = 100;
const MAX_TAGS: usize = 10;
const MAX_TAG_LENGTH: usize = 20;
const MAX_HOURS: f64 = 1000.0;
const MAX_TAGS_FILTER: usize = 200;
const MAX_SEARCH: usize = 50;
const MAX_COMMENT: usize = 1000;
const MAX_FILENAME: usize = 255;
const MAX_MIME_TYPE: usize = 100;

/// Collects field errors and turns them into one validation failure
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>, value: Option<&Value>) {
        let mut error = FieldError::new(field, message);
        if let Some(value) = value {
            error = error.with_value(value.clone());
        }
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TaskboardError::Validation(self.errors))
        }
    }

    /// Optional string of at most `max` characters after trimming
    fn optional_text(&mut self, body: &Map<String, Value>, field: &str, max: usize, message: &str) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                if s.trim().chars().count() > max {
                    self.error(field, message, body.get(field));
                }
            }
            Some(other) => self.error(field, format!("{field} must be a string"), Some(other)),
        }
    }

    /// Required non-blank string of at most `max` characters after trimming
    fn required_text(
        &mut self,
        body: &Map<String, Value>,
        field: &str,
        max: usize,
        missing: &str,
        too_long: &str,
    ) {
        match body.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if s.trim().chars().count() > max {
                    self.error(field, too_long, body.get(field));
                }
            }
            other => self.error(field, missing, other),
        }
    }

    fn one_of(&mut self, body: &Map<String, Value>, field: &str, allowed: &[&str], message: &str) {
        match body.get(field) {
            None => {}
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
            Some(other) => self.error(field, message, Some(other)),
        }
    }

    fn future_date(
        &mut self,
        body: &Map<String, Value>,
        field: &str,
        label: &str,
        now: DateTime<Utc>,
    ) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(date) if date.with_timezone(&Utc) < now => {
                    self.error(field, format!("{label} cannot be in the past"), body.get(field))
                }
                Ok(_) => {}
                Err(_) => self.error(field, format!("{label} must be a valid date"), body.get(field)),
            },
            Some(other) => self.error(field, format!("{label} must be a valid date"), Some(other)),
        }
    }

    fn hours(&mut self, body: &Map<String, Value>, field: &str, label: &str) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) if n.as_f64().is_some_and(|h| (0.0..=MAX_HOURS).contains(&h)) => {}
            Some(other) => self.error(
                field,
                format!("{label} hours must be between 0 and 1000"),
                Some(other),
            ),
        }
    }

    fn boolean(&mut self, body: &Map<String, Value>, field: &str) {
        match body.get(field) {
            None | Some(Value::Bool(_)) => {}
            Some(other) => self.error(field, format!("{field} must be a boolean"), Some(other)),
        }
    }

    fn tags(&mut self, body: &Map<String, Value>) {
        match body.get("tags") {
            None | Some(Value::Null) => {}
            Some(Value::Array(tags)) => {
                if tags.len() > MAX_TAGS {
                    self.error("tags", "Cannot have more than 10 tags", body.get("tags"));
                }
                for (i, tag) in tags.iter().enumerate() {
                    let ok = tag
                        .as_str()
                        .is_some_and(|t| t.trim().chars().count() <= MAX_TAG_LENGTH);
                    if !ok {
                        self.error(
                            &format!("tags[{i}]"),
                            "Each tag cannot be more than 20 characters",
                            Some(tag),
                        );
                    }
                }
            }
            Some(other) => self.error("tags", "Tags must be an array", Some(other)),
        }
    }

    fn dependencies(&mut self, body: &Map<String, Value>, own_id: Option<Uuid>) {
        match body.get("dependencies") {
            None | Some(Value::Null) => {}
            Some(Value::Array(ids)) => {
                for (i, id) in ids.iter().enumerate() {
                    let field = format!("dependencies[{i}]");
                    match id.as_str().and_then(|s| Uuid::parse_str(s).ok()) {
                        None => self.error(&field, "Each dependency must be a valid task ID", Some(id)),
                        Some(id_value) if Some(id_value) == own_id => {
                            self.error(&field, "A task cannot depend on itself", Some(id))
                        }
                        Some(_) => {}
                    }
                }
            }
            Some(other) => self.error("dependencies", "Dependencies must be an array", Some(other)),
        }
    }
}

fn as_object<'a>(body: &'a Value, validator: &mut Validator) -> Option<&'a Map<String, Value>> {
    let object = body.as_object();
    if object.is_none() {
        validator.error("body", "Request body must be a JSON object", None);
    }
    object
}

/// Rules shared by create and update
fn validate_task_fields(
    validator: &mut Validator,
    body: &Map<String, Value>,
    own_id: Option<Uuid>,
    now: DateTime<Utc>,
) {
    validator.optional_text(
        body,
        "description",
        MAX_DESCRIPTION,
        "Description cannot be more than 500 characters",
    );
    validator.one_of(
        body,
        "status",
        &TaskStatus::ALL.map(|s| s.as_str()),
        "Status must be one of: pending, in-progress, completed, cancelled",
    );
    validator.one_of(
        body,
        "priority",
        &TaskPriority::ALL.map(|p| p.as_str()),
        "Priority must be one of: low, medium, high, urgent",
    );
    validator.optional_text(
        body,
        "category",
        MAX_CATEGORY,
        "Category cannot be more than 50 characters",
    );
    validator.optional_text(
        body,
        "project",
        MAX_NAME,
        "Project name cannot be more than 100 characters",
    );
    validator.future_date(body, "dueDate", "Due date", now);
    validator.hours(body, "estimatedHours", "Estimated");
    validator.hours(body, "actualHours", "Actual");
    validator.tags(body);
    validator.dependencies(body, own_id);
    validator.optional_text(
        body,
        "assignee",
        MAX_NAME,
        "Assignee name cannot be more than 100 characters",
    );
    validator.optional_text(
        body,
        "reporter",
        MAX_NAME,
        "Reporter name cannot be more than 100 characters",
    );
    validator.boolean(body, "isCompleted");
    validator.future_date(body, "reminderDate", "Reminder date", now);
    validator.boolean(body, "isTemplate");
    validator.optional_text(
        body,
        "templateName",
        MAX_NAME,
        "Template name cannot be more than 100 characters",
    );
}

/// Field errors of a task creation body, empty when valid
pub fn task_creation_errors(body: &Value, now: DateTime<Utc>) -> Vec<FieldError> {
    let mut validator = Validator::new();
    if let Some(object) = as_object(body, &mut validator) {
        validator.required_text(
            object,
            "title",
            MAX_TITLE,
            "Title is required",
            "Title cannot be more than 100 characters",
        );
        validate_task_fields(&mut validator, object, None, now);
    }
    validator.into_errors()
}

/// Validate the body of a task creation
pub fn validate_new_task(body: &Value, now: DateTime<Utc>) -> Result<()> {
    let errors = task_creation_errors(body, now);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskboardError::Validation(errors))
    }
}

/// Validate the dates a template instance inherits from its template.
///
/// A template's due date may have passed since it was saved, so the merged
/// instance is checked against `now` the same way a creation body is.
pub fn validate_template_instance(task: &NewTask, now: DateTime<Utc>) -> Result<()> {
    let mut validator = Validator::new();
    for (field, label, date) in [
        ("dueDate", "Due date", task.due_date),
        ("reminderDate", "Reminder date", task.reminder_date),
    ] {
        if let Some(date) = date.filter(|d| *d < now) {
            validator.error(
                field,
                format!("{label} cannot be in the past"),
                Some(&Value::String(date.to_rfc3339())),
            );
        }
    }
    validator.finish()
}

/// Validate a partial update; `task_id` is the task being updated, if any
pub fn validate_task_update(body: &Value, task_id: Option<Uuid>, now: DateTime<Utc>) -> Result<()> {
    let mut validator = Validator::new();
    if let Some(object) = as_object(body, &mut validator) {
        if let Some(title) = object.get("title") {
            match title {
                Value::String(s) if s.trim().is_empty() => {
                    validator.error("title", "Title cannot be empty", Some(title))
                }
                Value::String(s) if s.trim().chars().count() > MAX_TITLE => validator.error(
                    "title",
                    "Title cannot be more than 100 characters",
                    Some(title),
                ),
                Value::String(_) => {}
                other => validator.error("title", "Title cannot be empty", Some(other)),
            }
        }
        validate_task_fields(&mut validator, object, task_id, now);
    }
    validator.finish()
}

/// Parse a task id path or body parameter
pub fn validate_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        TaskboardError::Validation(vec![
            FieldError::new("id", "Invalid task ID").with_value(Value::String(raw.to_string()))
        ])
    })
}

/// Parse a list of task ids, as used by bulk update and delete
pub fn validate_task_ids(body: &Value) -> Result<Vec<Uuid>> {
    let ids = match body.get("taskIds") {
        Some(Value::Array(ids)) if !ids.is_empty() => ids,
        _ => {
            return Err(TaskboardError::invalid_field(
                "taskIds",
                "Task IDs array is required and cannot be empty",
            ))
        }
    };

    let mut validator = Validator::new();
    let mut parsed = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        match id.as_str().and_then(|s| Uuid::parse_str(s).ok()) {
            Some(id) => parsed.push(id),
            None => validator.error(&format!("taskIds[{i}]"), "Invalid task ID", Some(id)),
        }
    }
    validator.finish()?;
    Ok(parsed)
}

pub fn validate_comment(body: &Value) -> Result<()> {
    let mut validator = Validator::new();
    if let Some(object) = as_object(body, &mut validator) {
        validator.required_text(
            object,
            "content",
            MAX_COMMENT,
            "Comment content is required",
            "Comment cannot be more than 1000 characters",
        );
        validator.required_text(
            object,
            "author",
            MAX_NAME,
            "Author is required",
            "Author name cannot be more than 100 characters",
        );
    }
    validator.finish()
}

pub fn validate_attachment(body: &Value) -> Result<()> {
    let mut validator = Validator::new();
    if let Some(object) = as_object(body, &mut validator) {
        validator.required_text(
            object,
            "filename",
            MAX_FILENAME,
            "Filename is required",
            "Filename cannot be more than 255 characters",
        );
        validator.required_text(
            object,
            "originalName",
            MAX_FILENAME,
            "Original filename is required",
            "Original filename cannot be more than 255 characters",
        );
        validator.required_text(
            object,
            "mimeType",
            MAX_MIME_TYPE,
            "MIME type is required",
            "MIME type cannot be more than 100 characters",
        );
        match object.get("size") {
            Some(Value::Number(n)) if n.as_u64().is_some_and(|s| s >= 1) => {}
            other => validator.error("size", "File size must be a positive integer", other),
        }
        match object.get("url") {
            Some(Value::String(url)) if is_http_url(url.trim()) => {}
            Some(Value::String(url)) if url.trim().is_empty() => {
                validator.error("url", "File URL is required", object.get("url"))
            }
            None => validator.error("url", "File URL is required", None),
            other => validator.error("url", "File URL must be a valid URL", other),
        }
    }
    validator.finish()
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Deserialize an already validated body into its typed payload
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| TaskboardError::invalid_field("body", &format!("Malformed request body: {e}")))
}

/// Checks on the filter parameters shared by list, search and export
struct QueryChecks {
    validator: Validator,
}

impl QueryChecks {
    fn new() -> Self {
        Self {
            validator: Validator::new(),
        }
    }

    fn value(raw: &str) -> Value {
        Value::String(raw.to_string())
    }

    fn one_of(&mut self, field: &str, value: &Option<String>, allowed: &[&str], message: &str) {
        if let Some(v) = present(value) {
            if !allowed.contains(&v) {
                self.validator.error(field, message, Some(&Self::value(v)));
            }
        }
    }

    fn max_len(&mut self, field: &str, value: &Option<String>, max: usize, message: &str) {
        if let Some(v) = present(value) {
            if v.chars().count() > max {
                self.validator.error(field, message, Some(&Self::value(v)));
            }
        }
    }

    fn flag(&mut self, field: &str, value: &Option<String>) {
        self.one_of(
            field,
            value,
            &["true", "false"],
            &format!("{field} must be true or false"),
        );
    }

    fn status(&mut self, value: &Option<String>) {
        self.one_of(
            "status",
            value,
            &TaskStatus::ALL.map(|s| s.as_str()),
            "Status must be one of: pending, in-progress, completed, cancelled",
        );
    }

    fn priority(&mut self, value: &Option<String>) {
        self.one_of(
            "priority",
            value,
            &TaskPriority::ALL.map(|p| p.as_str()),
            "Priority must be one of: low, medium, high, urgent",
        );
    }

    fn category(&mut self, value: &Option<String>) {
        self.max_len(
            "category",
            value,
            MAX_CATEGORY,
            "Category filter cannot be more than 50 characters",
        );
    }

    fn name(&mut self, field: &str, label: &str, value: &Option<String>) {
        self.max_len(
            field,
            value,
            MAX_NAME,
            &format!("{label} filter cannot be more than 100 characters"),
        );
    }

    fn tags(&mut self, value: &Option<String>) {
        self.max_len(
            "tags",
            value,
            MAX_TAGS_FILTER,
            "Tags filter cannot be more than 200 characters",
        );
    }

    fn search(&mut self, field: &str, value: &Option<String>) {
        self.max_len(
            field,
            value,
            MAX_SEARCH,
            "Search term must be between 1 and 50 characters",
        );
    }
}

/// Validate `GET /api/tasks` parameters; `max_limit` bounds the page size
pub fn validate_list_params(params: &TaskListParams, max_limit: u32) -> Result<()> {
    let mut checks = QueryChecks::new();

    if let Some(page) = present(&params.page) {
        if !page.parse::<u32>().is_ok_and(|p| p >= 1) {
            checks.validator.error(
                "page",
                "Page must be a positive integer",
                Some(&QueryChecks::value(page)),
            );
        }
    }
    if let Some(limit) = present(&params.limit) {
        if !limit.parse::<u32>().is_ok_and(|l| (1..=max_limit).contains(&l)) {
            checks.validator.error(
                "limit",
                format!("Limit must be between 1 and {max_limit}"),
                Some(&QueryChecks::value(limit)),
            );
        }
    }
    checks.status(&params.status);
    checks.priority(&params.priority);
    checks.category(&params.category);
    checks.name("project", "Project", &params.project);
    checks.name("assignee", "Assignee", &params.assignee);
    checks.name("reporter", "Reporter", &params.reporter);
    checks.flag("isCompleted", &params.is_completed);
    checks.flag("isTemplate", &params.is_template);
    checks.flag("overdue", &params.overdue);
    checks.tags(&params.tags);
    let sort_fields = SortField::ALL.map(|f| f.as_str());
    checks.one_of("sortBy", &params.sort_by, &sort_fields, "Invalid sort field");
    checks.one_of(
        "sortOrder",
        &params.sort_order,
        &["asc", "desc"],
        "Sort order must be asc or desc",
    );
    checks.search("search", &params.search);

    checks.validator.finish()
}

/// Validate `GET /api/tasks/search` parameters
pub fn validate_search_params(params: &AdvancedSearchParams) -> Result<()> {
    let mut checks = QueryChecks::new();
    checks.search("query", &params.query);
    checks.status(&params.status);
    checks.priority(&params.priority);
    checks.category(&params.category);
    checks.name("project", "Project", &params.project);
    checks.name("assignee", "Assignee", &params.assignee);
    checks.tags(&params.tags);
    checks.flag("isCompleted", &params.is_completed);
    checks.flag("hasAttachments", &params.has_attachments);
    checks.flag("hasComments", &params.has_comments);
    for (field, value) in [("dateFrom", &params.date_from), ("dateTo", &params.date_to)] {
        if let Some(v) = present(value) {
            if parse_date_param(v).is_none() {
                checks.validator.error(
                    field,
                    format!("{field} must be a valid date"),
                    Some(&QueryChecks::value(v)),
                );
            }
        }
    }
    checks.validator.finish()
}

/// Validate `GET /api/tasks/export` parameters
pub fn validate_export_params(params: &ExportParams) -> Result<()> {
    let mut checks = QueryChecks::new();
    checks.one_of(
        "format",
        &params.format,
        &["json", "csv"],
        "Format must be json or csv",
    );
    checks.status(&params.status);
    checks.priority(&params.priority);
    checks.category(&params.category);
    checks.name("project", "Project", &params.project);
    checks.flag("isCompleted", &params.is_completed);
    checks.validator.finish()
}
