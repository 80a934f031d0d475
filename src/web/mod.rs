//! # Web API
//!
//! The HTTP surface over the task services: routes, handlers, response
//! envelopes and shared state.

use std::{sync::Arc, time::Duration};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors);

    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::task_routes())
        .merge(routes::template_routes())
        .merge(routes::task_item_routes())
        .fallback(handlers::route_not_found)
        .layer(common_middleware)
        .with_state(state);

    info!(
        timeout_ms = request_timeout.as_millis() as u64,
        "Web application created with all routes and middleware"
    );
    app
}
