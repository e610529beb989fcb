//! API routes.

pub mod agents;
pub mod alerts;
pub mod health;
pub mod incidents;
pub mod notifications;
pub mod playbooks;
pub mod rules;
pub mod tasks;

use crate::state::AppState;
use axum::Router;

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(health::routes())
        .with_state(state)
}

/// API routes under the /api prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/agents", agents::routes())
        .nest("/playbooks", playbooks::routes())
        .nest("/tasks", tasks::routes())
        .nest("/incidents", incidents::routes())
        .nest("/rules", rules::routes())
        .nest("/alerts", alerts::routes())
        .nest("/notifications", notifications::routes())
}
