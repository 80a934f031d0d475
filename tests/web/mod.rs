//! # Web API Tests
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`,
//! no socket involved.

mod error_handling_tests;
mod task_endpoint_tests;

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use taskboard::web::create_app;
use tower::ServiceExt;

use crate::common::TestContext;

pub fn app(ctx: &TestContext) -> Router {
    create_app(ctx.state.clone(), Duration::from_secs(5))
}

/// Status, headers and raw body of one request
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body should be UTF-8")
    }
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .oneshot(builder.body(body).expect("valid request"))
        .await
        .expect("router is infallible");
    into_test_response(response).await
}

async fn into_test_response(response: Response) -> TestResponse {
    let header_value = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let status = response.status();
    let content_type = header_value(header::CONTENT_TYPE);
    let content_disposition = header_value(header::CONTENT_DISPOSITION);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec();

    TestResponse {
        status,
        content_type,
        content_disposition,
        body,
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

/// POST an unparsed body labelled as JSON
pub async fn send_raw(app: Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    into_test_response(
        app.oneshot(request)
            .await
            .expect("router is infallible"),
    )
    .await
}
