//! Task Service: every write to the collection.
//!
//! Each mutation is load, modify, stamp and replace. The completion invariant
//! is re-applied before every write, and updates append the history diff
//! against the loaded snapshot. The load and the replace are separate store
//! calls, so two concurrent updates of one task can each diff against a stale
//! snapshot.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::{project, TEMPLATE_OMITTED};
use crate::database::TaskStore;
use crate::error::{FieldError, Result, TaskboardError};
use crate::logging::log_task_operation;
use crate::models::history::diff;
use crate::models::{
    CreateFromTemplateRequest, NewAttachment, NewComment, NewTask, Task, TaskPatch, TaskStatus,
    TaskView,
};
use crate::query_builder::{SortDirection, SortField, SortSpec, TaskScope};
use crate::utils::Clock;
use crate::validation::{
    parse_body, task_creation_errors, validate_attachment, validate_comment, validate_new_task,
    validate_task_ids, validate_task_update, validate_template_instance,
};

/// Recorded as `changedBy` on history entries
pub const SYSTEM_ACTOR: &str = "system";

/// An item of a bulk create that failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub index: usize,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkCreateOutcome {
    pub created: Vec<TaskView>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    fn view(&self, task: Task) -> TaskView {
        TaskView::new(task, self.clock.now())
    }

    async fn load(&self, id: Uuid) -> Result<Task> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| TaskboardError::task_not_found(id))
    }

    /// Stamp, record history against `old` and write `new`.
    ///
    /// Returns whether any tracked field changed.
    async fn write_update(&self, old: &Task, mut new: Task) -> Result<(Task, bool)> {
        let now = self.clock.now();
        new.sync_completion(now);
        let entries = diff(old, &new, SYSTEM_ACTOR, now)?;
        let changed = !entries.is_empty();
        new.history.extend(entries);
        new.updated_at = now;
        Ok((self.store.replace(new).await?, changed))
    }

    pub async fn create(&self, body: Value) -> Result<TaskView> {
        let now = self.clock.now();
        validate_new_task(&body, now)?;
        let new_task: NewTask = parse_body(body)?;
        let task = self.store.insert(new_task.into_task(now)).await?;

        let id = task.id.to_string();
        log_task_operation("create", Some(&id), "success", None);
        Ok(self.view(task))
    }

    pub async fn get(&self, id: Uuid) -> Result<TaskView> {
        Ok(self.view(self.load(id).await?))
    }

    /// Apply a partial update and append history for every changed field
    pub async fn update(&self, id: Uuid, body: Value) -> Result<TaskView> {
        validate_task_update(&body, Some(id), self.clock.now())?;
        let patch: TaskPatch = parse_body(body)?;

        let existing = self.load(id).await?;
        let mut updated = existing.clone();
        patch.apply(&mut updated);
        let (task, changed) = self.write_update(&existing, updated).await?;

        let task_id = id.to_string();
        let details = format!("changed={changed}");
        log_task_operation("update", Some(&task_id), "success", Some(&details));
        Ok(self.view(task))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        match self.store.delete(id).await? {
            Some(_) => {
                let task_id = id.to_string();
                log_task_operation("delete", Some(&task_id), "success", None);
                Ok(())
            }
            None => Err(TaskboardError::task_not_found(id)),
        }
    }

    /// Mark completed now, whatever the previous completion time
    pub async fn complete(&self, id: Uuid) -> Result<TaskView> {
        let existing = self.load(id).await?;
        let mut updated = existing.clone();
        updated.is_completed = true;
        updated.status = TaskStatus::Completed;
        updated.completed_at = Some(self.clock.now());
        let (task, _) = self.write_update(&existing, updated).await?;

        let task_id = id.to_string();
        log_task_operation("complete", Some(&task_id), "success", None);
        Ok(self.view(task))
    }

    pub async fn add_comment(&self, id: Uuid, body: Value) -> Result<TaskView> {
        validate_comment(&body)?;
        let comment: NewComment = parse_body(body)?;

        let now = self.clock.now();
        let mut task = self.load(id).await?;
        task.comments.push(comment.into_comment(now));
        task.updated_at = now;
        let task = self.store.replace(task).await?;
        Ok(self.view(task))
    }

    pub async fn add_attachment(&self, id: Uuid, body: Value) -> Result<TaskView> {
        validate_attachment(&body)?;
        let attachment: NewAttachment = parse_body(body)?;

        let now = self.clock.now();
        let mut task = self.load(id).await?;
        task.attachments.push(attachment.into_attachment(now));
        task.updated_at = now;
        let task = self.store.replace(task).await?;
        Ok(self.view(task))
    }

    /// Insert every valid item of `{tasks: [...]}` and report the invalid ones.
    ///
    /// Fails as a whole only when the array is missing or empty, or when no
    /// item is valid.
    pub async fn bulk_create(&self, body: Value) -> Result<BulkCreateOutcome> {
        let items = match body.get("tasks") {
            Some(Value::Array(items)) if !items.is_empty() => items.clone(),
            _ => {
                return Err(TaskboardError::invalid_field(
                    "tasks",
                    "Tasks array is required and cannot be empty",
                ))
            }
        };

        let now = self.clock.now();
        let mut valid = Vec::with_capacity(items.len());
        let mut failed = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let errors = task_creation_errors(&item, now);
            if !errors.is_empty() {
                failed.push(BulkFailure { index, errors });
                continue;
            }
            match parse_body::<NewTask>(item) {
                Ok(new_task) => valid.push(new_task.into_task(now)),
                Err(TaskboardError::Validation(errors)) => failed.push(BulkFailure { index, errors }),
                Err(other) => return Err(other),
            }
        }

        if valid.is_empty() {
            return Err(TaskboardError::Validation(
                failed
                    .into_iter()
                    .flat_map(|failure| {
                        let index = failure.index;
                        failure.errors.into_iter().map(move |e| FieldError {
                            field: format!("tasks[{index}].{}", e.field),
                            ..e
                        })
                    })
                    .collect(),
            ));
        }
        if !failed.is_empty() {
            warn!(
                failed = failed.len(),
                valid = valid.len(),
                "Bulk create skipped invalid tasks"
            );
        }

        let created = self.store.insert_many(valid).await?;
        info!(created = created.len(), "Bulk created tasks");
        Ok(BulkCreateOutcome {
            created: created.into_iter().map(|t| self.view(t)).collect(),
            failed,
        })
    }

    /// Apply one patch to every listed task.
    ///
    /// Tasks are updated one after another; a storage failure part way leaves
    /// the earlier ones updated. Tasks the patch does not change are not written.
    pub async fn bulk_update(&self, body: Value) -> Result<BulkUpdateOutcome> {
        let ids = validate_task_ids(&body)?;
        let updates = body
            .get("updates")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        let now = self.clock.now();
        validate_task_update(&updates, None, now)?;
        let patch: TaskPatch = parse_body(updates)?;

        let mut outcome = BulkUpdateOutcome::default();
        for id in ids {
            let Some(existing) = self.store.get(id).await? else {
                continue;
            };
            outcome.matched_count += 1;

            let mut updated = existing.clone();
            patch.apply(&mut updated);
            updated.sync_completion(now);
            if diff(&existing, &updated, SYSTEM_ACTOR, now)?.is_empty() {
                continue;
            }
            self.write_update(&existing, updated).await?;
            outcome.modified_count += 1;
        }

        info!(
            matched = outcome.matched_count,
            modified = outcome.modified_count,
            "Bulk updated tasks"
        );
        Ok(outcome)
    }

    /// Delete every listed task, returning how many existed
    pub async fn bulk_delete(&self, body: Value) -> Result<u64> {
        let ids = validate_task_ids(&body)?;
        let deleted = self.store.delete_many(&ids).await?;
        info!(deleted, "Bulk deleted tasks");
        Ok(deleted)
    }

    /// Create a task with `isTemplate` forced on
    pub async fn create_template(&self, body: Value) -> Result<TaskView> {
        let now = self.clock.now();
        validate_new_task(&body, now)?;
        let mut new_task: NewTask = parse_body(body)?;
        new_task.is_template = Some(true);
        let template = self.store.insert(new_task.into_task(now)).await?;

        let id = template.id.to_string();
        log_task_operation("create_template", Some(&id), "success", None);
        Ok(self.view(template))
    }

    /// All templates in creation order, without history, comments or attachments
    pub async fn list_templates(&self) -> Result<Vec<Value>> {
        let predicate = TaskScope::new().templates().build();
        let sort = SortSpec::new(SortField::CreatedAt, SortDirection::Asc);
        self.store
            .find(&predicate, sort, None)
            .await?
            .into_iter()
            .map(|t| project(&self.view(t), TEMPLATE_OMITTED))
            .collect()
    }

    /// Instantiate a template, with customizations overriding its fields.
    ///
    /// A missing or malformed `templateId`, an unknown id and a task that is
    /// not a template are all reported as a missing template.
    pub async fn create_from_template(&self, body: Value) -> Result<TaskView> {
        let template_id = body.get("templateId").and_then(Value::as_str).unwrap_or("");
        let Ok(id) = Uuid::parse_str(template_id) else {
            return Err(TaskboardError::template_not_found(template_id));
        };
        let template = match self.store.get(id).await? {
            Some(task) if task.is_template => task,
            _ => return Err(TaskboardError::template_not_found(id)),
        };

        let now = self.clock.now();
        if let Some(Value::Object(customizations)) = body.get("customizations") {
            // Blank text falls back to the template's value
            let mut checked = customizations.clone();
            checked.retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
            validate_task_update(&Value::Object(checked), None, now)?;
        }
        let request: CreateFromTemplateRequest = parse_body(body)?;
        let new_task = request.customizations.instantiate(&template);
        validate_template_instance(&new_task, now)?;
        let task = self.store.insert(new_task.into_task(now)).await?;

        let task_id = task.id.to_string();
        let details = format!("template={id}");
        log_task_operation(
            "create_from_template",
            Some(&task_id),
            "success",
            Some(&details),
        );
        Ok(self.view(task))
    }
}
