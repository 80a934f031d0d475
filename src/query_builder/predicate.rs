//! Predicates over task documents.
//!
//! A [`Predicate`] is a flat list of [`Clause`]s joined by AND. The only OR is
//! inside [`Clause::TextSearch`], which matches when any of its fields
//! contains the needle. Clause order never changes the result: evaluation is
//! a conjunction over independent clause checks.
//!
//! The same predicate is evaluated in memory ([`Predicate::matches`]) and
//! rendered to SQL by [`super::conditions`].

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::models::Task;

/// Addressable task fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
    Category,
    Project,
    Assignee,
    Reporter,
    DueDate,
    ReminderDate,
    CreatedAt,
    UpdatedAt,
    IsCompleted,
    IsTemplate,
    EstimatedHours,
    ActualHours,
    Tags,
    Comments,
    Attachments,
}

/// Storage representation of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Time,
    Number,
    List,
}

impl TaskField {
    /// Key of the field in the stored document
    pub fn json_key(&self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::Status => "status",
            TaskField::Priority => "priority",
            TaskField::Category => "category",
            TaskField::Project => "project",
            TaskField::Assignee => "assignee",
            TaskField::Reporter => "reporter",
            TaskField::DueDate => "dueDate",
            TaskField::ReminderDate => "reminderDate",
            TaskField::CreatedAt => "createdAt",
            TaskField::UpdatedAt => "updatedAt",
            TaskField::IsCompleted => "isCompleted",
            TaskField::IsTemplate => "isTemplate",
            TaskField::EstimatedHours => "estimatedHours",
            TaskField::ActualHours => "actualHours",
            TaskField::Tags => "tags",
            TaskField::Comments => "comments",
            TaskField::Attachments => "attachments",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            TaskField::Title
            | TaskField::Description
            | TaskField::Status
            | TaskField::Priority
            | TaskField::Category
            | TaskField::Project
            | TaskField::Assignee
            | TaskField::Reporter => FieldKind::Text,
            TaskField::DueDate
            | TaskField::ReminderDate
            | TaskField::CreatedAt
            | TaskField::UpdatedAt => FieldKind::Time,
            TaskField::IsCompleted | TaskField::IsTemplate => FieldKind::Bool,
            TaskField::EstimatedHours | TaskField::ActualHours => FieldKind::Number,
            TaskField::Tags | TaskField::Comments | TaskField::Attachments => FieldKind::List,
        }
    }

    /// The scalar value of this field on `task`, `None` when unset.
    ///
    /// List fields have no scalar value.
    pub fn value_of(&self, task: &Task) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        match self {
            TaskField::Title => Some(FieldValue::Text(task.title.clone())),
            TaskField::Description => text(&task.description),
            TaskField::Status => Some(FieldValue::Text(task.status.as_str().to_string())),
            TaskField::Priority => Some(FieldValue::Text(task.priority.as_str().to_string())),
            TaskField::Category => text(&task.category),
            TaskField::Project => text(&task.project),
            TaskField::Assignee => text(&task.assignee),
            TaskField::Reporter => text(&task.reporter),
            TaskField::DueDate => task.due_date.map(FieldValue::Time),
            TaskField::ReminderDate => task.reminder_date.map(FieldValue::Time),
            TaskField::CreatedAt => Some(FieldValue::Time(task.created_at)),
            TaskField::UpdatedAt => Some(FieldValue::Time(task.updated_at)),
            TaskField::IsCompleted => Some(FieldValue::Bool(task.is_completed)),
            TaskField::IsTemplate => Some(FieldValue::Bool(task.is_template)),
            TaskField::EstimatedHours => task.estimated_hours.map(FieldValue::Number),
            TaskField::ActualHours => task.actual_hours.map(FieldValue::Number),
            TaskField::Tags | TaskField::Comments | TaskField::Attachments => None,
        }
    }

    fn list_len(&self, task: &Task) -> usize {
        match self {
            TaskField::Tags => task.tags.len(),
            TaskField::Comments => task.comments.len(),
            TaskField::Attachments => task.attachments.len(),
            _ => 0,
        }
    }
}

/// A concrete value to compare a field against
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Time(DateTime<Utc>),
    Number(f64),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Order two values of the same variant; mixed variants do not compare
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Time(a), FieldValue::Time(b)) => Some(a.cmp(b)),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Group key / CSV representation
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Time(t) => t.to_rfc3339(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

/// Comparison operator for range clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparison {
    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Lte => ordering != Ordering::Greater,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Gte => ordering != Ordering::Less,
        }
    }
}

/// One constraint a matching task must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field is set and equal to the value
    Equals { field: TaskField, value: FieldValue },
    /// Field is unset or differs from the value
    NotEquals { field: TaskField, value: FieldValue },
    /// List field shares at least one element with `values`
    AnyOf { field: TaskField, values: Vec<String> },
    /// Any of `fields` contains `needle`, case-insensitively
    TextSearch { fields: Vec<TaskField>, needle: String },
    /// Field is set (not missing, not null)
    Exists { field: TaskField },
    /// Field is set and compares to `value` with `op`
    Compare {
        field: TaskField,
        op: Comparison,
        value: FieldValue,
    },
    /// List field has at least one element
    NonEmpty { field: TaskField },
}

impl Clause {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Clause::Equals { field, value } => field.value_of(task).as_ref() == Some(value),
            Clause::NotEquals { field, value } => field.value_of(task).as_ref() != Some(value),
            Clause::AnyOf { field, values } => match field {
                TaskField::Tags => task.tags.iter().any(|tag| values.contains(tag)),
                other => other
                    .value_of(task)
                    .is_some_and(|v| values.contains(&v.render())),
            },
            Clause::TextSearch { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| match field.value_of(task) {
                    Some(FieldValue::Text(haystack)) => haystack.to_lowercase().contains(&needle),
                    _ => false,
                })
            }
            Clause::Exists { field } => field.value_of(task).is_some(),
            Clause::Compare { field, op, value } => field
                .value_of(task)
                .and_then(|actual| actual.compare(value))
                .is_some_and(|ordering| op.holds(ordering)),
            Clause::NonEmpty { field } => field.list_len(task) > 0,
        }
    }
}

/// A conjunction of clauses. The empty predicate matches every task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Add a clause (builder style)
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Exact-match clause on a field
    pub fn where_eq(self, field: TaskField, value: FieldValue) -> Self {
        self.and(Clause::Equals { field, value })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.clauses.iter().all(|clause| clause.matches(task))
    }
}
