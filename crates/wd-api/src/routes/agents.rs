//! Agent management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{AgentResponse, CreateAgentRequest, MessageResponse, UpdateAgentRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::AgentUpdate;
use wd_core::{AgentService, NewAgent};

/// Creates agent routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents).post(create_agent))
        .route("/:id", get(get_agent).put(update_agent).delete(delete_agent))
}

/// List all agents.
#[utoipa::path(
    get,
    path = "/api/agents",
    responses(
        (status = 200, description = "List of agents", body = Vec<AgentResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Agents"
)]
pub(crate) async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentResponse>>, ApiError> {
    let agents = AgentService::new(&state.db).list().await?;
    Ok(Json(agents.into_iter().map(AgentResponse::from).collect()))
}

/// Register a new agent.
#[utoipa::path(
    post,
    path = "/api/agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent created", body = AgentResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "Agents"
)]
pub(crate) async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiError> {
    request.validate()?;

    let agent = AgentService::new(&state.db)
        .create(NewAgent {
            name: request.name,
            agent_type: request.agent_type,
            status: request.status,
            version: request.version,
            is_active: request.is_active,
            configuration: request.configuration.unwrap_or_else(|| serde_json::json!({})),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(agent.into())))
}

/// Get a single agent by ID.
#[utoipa::path(
    get,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent details", body = AgentResponse),
        (status = 404, description = "Agent not found")
    ),
    tag = "Agents"
)]
pub(crate) async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentResponse>, ApiError> {
    let agent = AgentService::new(&state.db).get(id).await?;
    Ok(Json(agent.into()))
}

/// Update an agent.
#[utoipa::path(
    put,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    request_body = UpdateAgentRequest,
    responses(
        (status = 200, description = "Updated agent", body = AgentResponse),
        (status = 404, description = "Agent not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Agents"
)]
pub(crate) async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAgentRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    request.validate()?;

    let agent = AgentService::new(&state.db)
        .update(
            id,
            AgentUpdate {
                name: request.name,
                agent_type: request.agent_type,
                status: request.status,
                version: request.version,
                is_active: request.is_active,
                last_seen: request.last_seen.map(Some),
                configuration: request.configuration,
            },
        )
        .await?;

    Ok(Json(agent.into()))
}

/// Delete an agent.
///
/// Blocked with 409 while tasks or incidents still reference the agent.
#[utoipa::path(
    delete,
    path = "/api/agents/{id}",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent deleted", body = MessageResponse),
        (status = 404, description = "Agent not found"),
        (status = 409, description = "Agent is still referenced")
    ),
    tag = "Agents"
)]
pub(crate) async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    AgentService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Agent deleted successfully")))
}
