//! Playbook management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreatePlaybookRequest, MessageResponse, PlaybookResponse, UpdatePlaybookRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::PlaybookUpdate;
use wd_core::{NewPlaybook, PlaybookService};

/// Creates playbook routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_playbooks).post(create_playbook))
        .route(
            "/:id",
            get(get_playbook).put(update_playbook).delete(delete_playbook),
        )
}

/// List all playbooks.
#[utoipa::path(
    get,
    path = "/api/playbooks",
    responses(
        (status = 200, description = "List of playbooks", body = Vec<PlaybookResponse>)
    ),
    tag = "Playbooks"
)]
pub(crate) async fn list_playbooks(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaybookResponse>>, ApiError> {
    let playbooks = PlaybookService::new(&state.db).list().await?;
    Ok(Json(
        playbooks.into_iter().map(PlaybookResponse::from).collect(),
    ))
}

/// Create a new playbook.
#[utoipa::path(
    post,
    path = "/api/playbooks",
    request_body = CreatePlaybookRequest,
    responses(
        (status = 201, description = "Playbook created", body = PlaybookResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "Playbooks"
)]
pub(crate) async fn create_playbook(
    State(state): State<AppState>,
    Json(request): Json<CreatePlaybookRequest>,
) -> Result<(StatusCode, Json<PlaybookResponse>), ApiError> {
    request.validate()?;

    let playbook = PlaybookService::new(&state.db)
        .create(NewPlaybook {
            name: request.name,
            description: request.description,
            version: request.version,
            steps: request.steps,
            parameters: request.parameters,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(playbook.into())))
}

/// Get a single playbook by ID.
#[utoipa::path(
    get,
    path = "/api/playbooks/{id}",
    params(("id" = Uuid, Path, description = "Playbook ID")),
    responses(
        (status = 200, description = "Playbook details", body = PlaybookResponse),
        (status = 404, description = "Playbook not found")
    ),
    tag = "Playbooks"
)]
pub(crate) async fn get_playbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaybookResponse>, ApiError> {
    let playbook = PlaybookService::new(&state.db).get(id).await?;
    Ok(Json(playbook.into()))
}

/// Update a playbook.
#[utoipa::path(
    put,
    path = "/api/playbooks/{id}",
    params(("id" = Uuid, Path, description = "Playbook ID")),
    request_body = UpdatePlaybookRequest,
    responses(
        (status = 200, description = "Updated playbook", body = PlaybookResponse),
        (status = 404, description = "Playbook not found")
    ),
    tag = "Playbooks"
)]
pub(crate) async fn update_playbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlaybookRequest>,
) -> Result<Json<PlaybookResponse>, ApiError> {
    request.validate()?;

    let playbook = PlaybookService::new(&state.db)
        .update(
            id,
            PlaybookUpdate {
                name: request.name,
                description: request.description,
                version: request.version,
                steps: request.steps,
                parameters: request.parameters.map(Some),
            },
        )
        .await?;

    Ok(Json(playbook.into()))
}

/// Delete a playbook.
///
/// Blocked with 409 while tasks still reference the playbook.
#[utoipa::path(
    delete,
    path = "/api/playbooks/{id}",
    params(("id" = Uuid, Path, description = "Playbook ID")),
    responses(
        (status = 200, description = "Playbook deleted", body = MessageResponse),
        (status = 404, description = "Playbook not found"),
        (status = 409, description = "Playbook is still referenced")
    ),
    tag = "Playbooks"
)]
pub(crate) async fn delete_playbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    PlaybookService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Playbook deleted successfully")))
}
