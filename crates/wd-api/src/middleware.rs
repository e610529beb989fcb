//! HTTP middleware for the API server.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Header carrying the correlation id of a request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id attached to each request's extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Assigns a correlation id (reusing the caller's, when present), logs the
/// outcome of every request, and echoes the id back in the response.
pub async fn track_request(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        warn!(id = %id, method = %method, path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        info!(id = %id, method = %method, path, status = status.as_u16(), elapsed_ms, "request handled");
    }

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Wide-open CORS for the browser dashboard, mirroring the service's
/// unauthenticated surface.
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::permissive()
}
