//! Error types for the Taskboard system.

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskboardError {
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TaskboardError {
    pub fn task_not_found(id: impl ToString) -> Self {
        TaskboardError::NotFound {
            resource: "Task",
            id: id.to_string(),
        }
    }

    pub fn template_not_found(id: impl ToString) -> Self {
        TaskboardError::NotFound {
            resource: "Template",
            id: id.to_string(),
        }
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: &str) -> Self {
        TaskboardError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskboardError::NotFound { .. })
    }
}

impl From<serde_json::Error> for TaskboardError {
    fn from(error: serde_json::Error) -> Self {
        TaskboardError::Storage(format!("Document serialization error: {error}"))
    }
}

impl From<sqlx::Error> for TaskboardError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => TaskboardError::NotFound {
                resource: "Task",
                id: "unknown".to_string(),
            },
            other => TaskboardError::Storage(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for TaskboardError {
    fn from(err: config::ConfigError) -> Self {
        TaskboardError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskboardError>;
