//! Single-key sort specification.
//!
//! Exactly one sort key is applied. No tie-break key is added, so tasks that
//! compare equal come back in whatever order the store yields them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::predicate::TaskField;
use crate::error::TaskboardError;
use crate::models::Task;

/// Fields a list may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
    Category,
    Project,
    Assignee,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Title,
        SortField::Status,
        SortField::Priority,
        SortField::DueDate,
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Category,
        SortField::Project,
        SortField::Assignee,
    ];

    pub fn field(&self) -> TaskField {
        match self {
            SortField::Title => TaskField::Title,
            SortField::Status => TaskField::Status,
            SortField::Priority => TaskField::Priority,
            SortField::DueDate => TaskField::DueDate,
            SortField::CreatedAt => TaskField::CreatedAt,
            SortField::UpdatedAt => TaskField::UpdatedAt,
            SortField::Category => TaskField::Category,
            SortField::Project => TaskField::Project,
            SortField::Assignee => TaskField::Assignee,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.field().json_key()
    }
}

impl FromStr for SortField {
    type Err = TaskboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| TaskboardError::InvalidInput(format!("Invalid sort field: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the literal `"desc"` sorts descending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest first
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Build from the raw `sortBy`/`sortOrder` parameters.
    ///
    /// No (or an unknown) `sortBy` gives the default; a field without an
    /// order sorts ascending.
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        match sort_by.map(str::trim).and_then(|s| s.parse::<SortField>().ok()) {
            Some(field) => Self::new(field, SortDirection::from_param(sort_order.map(str::trim))),
            None => Self::default(),
        }
    }

    /// Compare two tasks by the sort key. Unset values sort before set ones
    /// when ascending.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let field = self.field.field();
        let ordering = match (field.value_of(a), field.value_of(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}
