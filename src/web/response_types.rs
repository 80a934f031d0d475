//! # Web API Response Types
//!
//! Success envelopes and the error type of the HTTP layer.
//!
//! Every body carries `status: "success" | "error"`. Errors map as:
//! validation → 400 with per-field `errors`, missing resource → 404, anything
//! else → 500 with the operation's failure message and the underlying error.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{FieldError, TaskboardError};
use crate::logging::log_error;
use crate::query_builder::PaginationInfo;

const SUCCESS: &str = "success";
const ERROR: &str = "error";

/// Paginated list: `{status, results, pagination, data}`
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub status: &'static str,
    pub results: usize,
    pub pagination: PaginationInfo,
    pub data: Vec<T>,
}

impl<T> PageEnvelope<T> {
    pub fn new(pagination: PaginationInfo, data: Vec<T>) -> Self {
        Self {
            status: SUCCESS,
            results: data.len(),
            pagination,
            data,
        }
    }
}

/// Unpaginated collection: `{status, results, data}`
#[derive(Debug, Serialize)]
pub struct CollectionEnvelope<T> {
    pub status: &'static str,
    pub results: usize,
    pub data: Vec<T>,
}

impl<T> CollectionEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: SUCCESS,
            results: data.len(),
            data,
        }
    }
}

/// Single item: `{status, message?, data}`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: SUCCESS,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: SUCCESS,
            message: Some(message.into()),
            data,
        }
    }
}

/// Body without data: `{status, message}`
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub status: &'static str,
    pub message: String,
}

impl MessageEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
        }
    }
}

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Route {path} not found")]
    RouteNotFound { path: String },

    #[error("Service temporarily unavailable: {reason}")]
    ServiceUnavailable { reason: String },

    #[error("{message}: {error}")]
    Internal { message: String, error: String },
}

impl ApiError {
    /// Classify a crate error; `failure` is the message used when the error
    /// is a server-side failure, e.g. "Failed to fetch tasks"
    pub fn from_error(error: TaskboardError, failure: &str) -> Self {
        match error {
            TaskboardError::Validation(errors) => ApiError::Validation(errors),
            TaskboardError::NotFound { resource, .. } => ApiError::NotFound { resource },
            TaskboardError::InvalidInput(message) => ApiError::BadRequest { message },
            other => {
                let error = other.to_string();
                log_error("web", failure, &error, None);
                ApiError::Internal {
                    message: failure.to_string(),
                    error,
                }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let body: Value = match self {
            ApiError::Validation(errors) => json!({
                "status": ERROR,
                "message": "Validation failed",
                "errors": errors,
            }),
            ApiError::BadRequest { message } => json!({ "status": ERROR, "message": message }),
            ApiError::NotFound { resource } => json!({
                "status": ERROR,
                "message": format!("{resource} not found"),
            }),
            ApiError::RouteNotFound { path } => json!({
                "status": ERROR,
                "message": format!("Route {path} not found"),
            }),
            ApiError::ServiceUnavailable { reason } => json!({
                "status": ERROR,
                "message": "Service temporarily unavailable",
                "error": reason,
            }),
            ApiError::Internal { message, error } => json!({
                "status": ERROR,
                "message": message,
                "error": error,
            }),
        };

        (status_code, Json(body)).into_response()
    }
}

/// A malformed or non-JSON body is a validation failure on `body`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

/// A query string that does not deserialize is a validation failure on `query`
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

/// Attach the operation's failure message while converting crate errors
pub trait OrFail<T> {
    fn or_fail(self, failure: &str) -> ApiResult<T>;
}

impl<T> OrFail<T> for crate::error::Result<T> {
    fn or_fail(self, failure: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::from_error(e, failure))
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;
