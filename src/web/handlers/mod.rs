//! # Web API Request Handlers
//!
//! Contains all HTTP request handlers organized by functional area.

pub mod health;
pub mod stats;
pub mod tasks;
pub mod templates;

use axum::http::Uri;

use crate::web::response_types::ApiError;

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        path: uri
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
    }
}
