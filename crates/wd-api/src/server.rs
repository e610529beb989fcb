//! API server implementation.

use axum::{middleware, routing::get, Json, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

use crate::dto::*;
use crate::error::ErrorResponse;
use crate::middleware::{cors_layer, track_request};
use crate::routes;
use crate::state::AppState;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind to.
    pub bind_address: SocketAddr,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::health::readiness_check,
        crate::routes::health::liveness_check,
        crate::routes::agents::list_agents,
        crate::routes::agents::create_agent,
        crate::routes::agents::get_agent,
        crate::routes::agents::update_agent,
        crate::routes::agents::delete_agent,
        crate::routes::playbooks::list_playbooks,
        crate::routes::playbooks::create_playbook,
        crate::routes::playbooks::get_playbook,
        crate::routes::playbooks::update_playbook,
        crate::routes::playbooks::delete_playbook,
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::create_task,
        crate::routes::tasks::get_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,
        crate::routes::incidents::list_incidents,
        crate::routes::incidents::create_incident,
        crate::routes::incidents::get_incident,
        crate::routes::incidents::update_incident,
        crate::routes::incidents::delete_incident,
        crate::routes::rules::list_rules,
        crate::routes::rules::create_rule,
        crate::routes::rules::get_rule,
        crate::routes::rules::update_rule,
        crate::routes::rules::delete_rule,
        crate::routes::alerts::list_alerts,
        crate::routes::alerts::create_alert,
        crate::routes::alerts::get_alert,
        crate::routes::alerts::update_alert,
        crate::routes::alerts::delete_alert,
        crate::routes::notifications::list_notifications,
        crate::routes::notifications::send_notification,
    ),
    components(
        schemas(
            HealthResponse,
            DatabaseHealth,
            MessageResponse,
            ErrorResponse,
            CreateAgentRequest,
            UpdateAgentRequest,
            AgentResponse,
            CreatePlaybookRequest,
            UpdatePlaybookRequest,
            PlaybookResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            TaskResponse,
            CreateIncidentRequest,
            UpdateIncidentRequest,
            IncidentResponse,
            CreateRuleRequest,
            UpdateRuleRequest,
            RuleResponse,
            CreateAlertRequest,
            UpdateAlertRequest,
            AlertResponse,
            SendNotificationRequest,
            NotificationResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Agents", description = "Sensor/collector registry"),
        (name = "Playbooks", description = "Response procedures"),
        (name = "Tasks", description = "Playbook executions"),
        (name = "Incidents", description = "Security event lifecycle"),
        (name = "Rules", description = "Detection rules"),
        (name = "Alerts", description = "Legacy alert records"),
        (name = "Notifications", description = "Outbound chat notifications"),
    ),
    info(
        title = "Watchdesk API",
        version = "0.1.0",
        description = "Security operations bookkeeping API",
        license(name = "MIT"),
    )
)]
pub struct ApiDoc;

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server.
    pub fn new(state: AppState, config: ApiServerConfig) -> Self {
        Self { config, state }
    }

    /// Creates a new API server with default configuration.
    pub fn with_state(state: AppState) -> Self {
        Self::new(state, ApiServerConfig::default())
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        routes::health::init_start_time();

        let app = routes::create_router(self.state.clone());

        // The OpenAPI document is served as plain JSON.
        let app = app.route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

        app.layer(middleware::from_fn(track_request))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(CatchPanicLayer::new())
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = self.config.bind_address;
        let listener = TcpListener::bind(addr).await?;
        info!(address = %addr, "API server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

/// Resolves when the process receives Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_state;

    #[tokio::test]
    async fn test_router_creation() {
        let (state, _notifier) = test_state().await;
        let server = ApiServer::with_state(state);
        let _router = server.router();
    }

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/agents"));
        assert!(doc.paths.paths.contains_key("/api/notifications/send"));
    }
}
