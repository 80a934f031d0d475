//! Request payloads that create or mutate tasks.
//!
//! These types are deserialized only after the raw JSON body has passed
//! [`crate::validation`], so they trust their contents. String fields are
//! trimmed when applied to a task.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::task::{Attachment, Comment, Task, TaskPriority, TaskStatus};
use crate::utils::serde::deserialize_some;

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn trimmed_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}

/// Body of `POST /api/tasks` and each element of a bulk create
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub dependencies: Option<Vec<Uuid>>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub is_completed: Option<bool>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub is_template: Option<bool>,
    pub template_name: Option<String>,
}

impl NewTask {
    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        let mut task = Task::new(self.title.trim(), now);
        task.description = trimmed(self.description);
        task.status = self.status.unwrap_or_default();
        task.priority = self.priority.unwrap_or_default();
        task.category = trimmed(self.category);
        task.project = trimmed(self.project);
        task.due_date = self.due_date;
        task.estimated_hours = self.estimated_hours;
        task.actual_hours = self.actual_hours;
        task.tags = trimmed_tags(self.tags.unwrap_or_default());
        task.dependencies = self.dependencies.unwrap_or_default();
        task.assignee = trimmed(self.assignee);
        task.reporter = trimmed(self.reporter);
        task.is_completed = self.is_completed.unwrap_or(false);
        task.reminder_date = self.reminder_date;
        task.is_template = self.is_template.unwrap_or(false);
        task.template_name = trimmed(self.template_name);
        task.sync_completion(now);
        task
    }
}

/// Body of `PUT`/`PATCH /api/tasks/:id` and the `updates` of a bulk update.
///
/// Nullable fields use `Option<Option<T>>`: absent leaves the field alone,
/// `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub project: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub estimated_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub actual_hours: Option<Option<f64>>,
    pub tags: Option<Vec<String>>,
    pub dependencies: Option<Vec<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reporter: Option<Option<String>>,
    pub is_completed: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reminder_date: Option<Option<DateTime<Utc>>>,
    pub is_template: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub template_name: Option<Option<String>>,
}

impl TaskPatch {
    /// Overwrite the fields present in the patch. Does not touch timestamps.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = trimmed(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category {
            task.category = trimmed(category.clone());
        }
        if let Some(project) = &self.project {
            task.project = trimmed(project.clone());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(hours) = self.estimated_hours {
            task.estimated_hours = hours;
        }
        if let Some(hours) = self.actual_hours {
            task.actual_hours = hours;
        }
        if let Some(tags) = &self.tags {
            task.tags = trimmed_tags(tags.clone());
        }
        if let Some(dependencies) = &self.dependencies {
            task.dependencies = dependencies.clone();
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = trimmed(assignee.clone());
        }
        if let Some(reporter) = &self.reporter {
            task.reporter = trimmed(reporter.clone());
        }
        if let Some(is_completed) = self.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(reminder_date) = self.reminder_date {
            task.reminder_date = reminder_date;
        }
        if let Some(is_template) = self.is_template {
            task.is_template = is_template;
        }
        if let Some(template_name) = &self.template_name {
            task.template_name = trimmed(template_name.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

impl NewComment {
    pub fn into_comment(self, now: DateTime<Utc>) -> Comment {
        Comment {
            content: self.content.trim().to_string(),
            author: self.author.trim().to_string(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
}

impl NewAttachment {
    pub fn into_attachment(self, now: DateTime<Utc>) -> Attachment {
        Attachment {
            filename: self.filename.trim().to_string(),
            original_name: self.original_name.trim().to_string(),
            mime_type: self.mime_type.trim().to_string(),
            size: self.size,
            url: self.url.trim().to_string(),
            uploaded_at: now,
        }
    }
}

/// Overrides applied when instantiating a task from a template.
///
/// A customization wins only when it is "set": non-empty text, non-zero hours.
/// A supplied tag list always wins, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCustomizations {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub estimated_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
}

fn pick_text(custom: Option<String>, template: &Option<String>) -> Option<String> {
    custom.filter(|v| !v.is_empty()).or_else(|| template.clone())
}

impl TemplateCustomizations {
    /// Build the creation payload for a new task from `template`
    pub fn instantiate(self, template: &Task) -> NewTask {
        NewTask {
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| template.title.clone()),
            description: pick_text(self.description, &template.description),
            priority: Some(self.priority.unwrap_or(template.priority)),
            category: pick_text(self.category, &template.category),
            project: pick_text(self.project, &template.project),
            estimated_hours: self
                .estimated_hours
                .filter(|h| *h != 0.0)
                .or(template.estimated_hours),
            tags: Some(self.tags.unwrap_or_else(|| template.tags.clone())),
            due_date: self.due_date.or(template.due_date),
            assignee: pick_text(self.assignee, &template.assignee),
            reporter: pick_text(self.reporter, &template.reporter),
            ..NewTask::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFromTemplateRequest {
    pub template_id: Uuid,
    #[serde(default)]
    pub customizations: TemplateCustomizations,
}
