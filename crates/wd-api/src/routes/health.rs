//! Health and probe endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::OnceLock;
use std::time::Instant;

use crate::dto::{DatabaseHealth, HealthResponse};
use crate::state::AppState;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Records the server start time for uptime reporting.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

fn uptime_seconds() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

async fn database_health(state: &AppState) -> (bool, DatabaseHealth) {
    let connected = state.db.is_healthy().await;
    (
        connected,
        DatabaseHealth {
            connected,
            pool_size: state.db.pool_size(),
            idle_connections: state.db.idle_connections(),
        },
    )
}

/// Overall system health.
///
/// The database is the only hard dependency, so its ping decides between
/// 200 and 503.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub(crate) async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (connected, database) = database_health(&state).await;

    let (code, status) = if connected {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        uptime_seconds: uptime_seconds(),
    };

    (code, Json(body))
}

/// Readiness probe: 200 once the store answers queries.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = "Health"
)]
pub(crate) async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.db.is_healthy().await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe: always 200 while the process is serving.
#[utoipa::path(
    get,
    path = "/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = "Health"
)]
pub(crate) async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
