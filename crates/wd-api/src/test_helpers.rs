//! Shared helpers for route tests.

use crate::routes;
use crate::state::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wd_core::db::{create_pool_with_options, run_migrations, PoolOptions};
use wd_notify::MockNotifier;

/// Creates an AppState backed by an isolated in-memory database and a mock
/// notifier.
pub(crate) async fn test_state() -> (AppState, Arc<MockNotifier>) {
    let url = format!(
        "sqlite:file:wdapitest_{}?mode=memory&cache=shared",
        Uuid::new_v4().simple()
    );
    let options = PoolOptions {
        max_connections: 1,
        min_connections: 1,
        acquire_timeout: Duration::from_secs(5),
    };
    let pool = create_pool_with_options(&url, options)
        .await
        .expect("create test pool");
    run_migrations(&pool).await.expect("run migrations");

    let notifier = Arc::new(MockNotifier::new());
    (AppState::new(pool, notifier.clone()), notifier)
}

/// Creates the full API router on top of a fresh test state.
pub(crate) async fn test_router() -> (Router, Arc<MockNotifier>) {
    let (state, notifier) = test_state().await;
    (routes::create_router(state), notifier)
}

/// Builds a request with an optional JSON body.
pub(crate) fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON.
pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}
