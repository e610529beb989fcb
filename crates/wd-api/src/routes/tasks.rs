//! Task management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateTaskRequest, MessageResponse, TaskResponse, UpdateTaskRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::TaskUpdate;
use wd_core::{NewTask, TaskService};

/// Creates task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

/// List all tasks.
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "List of tasks", body = Vec<TaskResponse>)
    ),
    tag = "Tasks"
)]
pub(crate) async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = TaskService::new(&state.db).list().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Create a new task.
///
/// Both `agent_id` and `playbook_id` must reference existing records.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 422, description = "Validation failed or reference does not resolve")
    ),
    tag = "Tasks"
)]
pub(crate) async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    request.validate()?;

    let task = TaskService::new(&state.db)
        .create(NewTask {
            name: request.name,
            description: request.description,
            status: request.status,
            priority: request.priority,
            agent_id: request.agent_id,
            playbook_id: request.playbook_id,
            parameters: request.parameters.unwrap_or_else(|| serde_json::json!({})),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get a single task by ID.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = TaskResponse),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub(crate) async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = TaskService::new(&state.db).get(id).await?;
    Ok(Json(task.into()))
}

/// Update a task.
///
/// Status changes follow the guarded lifecycle
/// `pending -> running -> {completed, failed}`.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Concurrent status change"),
        (status = 422, description = "Invalid status transition")
    ),
    tag = "Tasks"
)]
pub(crate) async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    request.validate()?;

    let task = TaskService::new(&state.db)
        .update(
            id,
            TaskUpdate {
                name: request.name,
                description: request.description,
                priority: request.priority,
                parameters: request.parameters,
                result: request.result.map(Some),
                started_at: request.started_at.map(Some),
                completed_at: request.completed_at.map(Some),
                status: request.status,
                expected_status: None,
            },
        )
        .await?;

    Ok(Json(task.into()))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "Task not found")
    ),
    tag = "Tasks"
)]
pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    TaskService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{body_json, request, test_router};
    use axum::http::StatusCode;
    use axum::Router;
    use tower::ServiceExt;

    async fn create_refs(app: &Router) -> (String, String) {
        let agent = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/agents",
                    Some(serde_json::json!({
                        "name": "Endpoint Agent",
                        "agent_type": "endpoint",
                        "status": "active",
                        "version": "1.0.0"
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;

        let playbook = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/playbooks",
                    Some(serde_json::json!({
                        "name": "Isolation",
                        "version": "1.0.0"
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;

        (
            agent["id"].as_str().unwrap().to_string(),
            playbook["id"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_task_with_defaults() {
        let (app, _state) = test_router().await;
        let (agent_id, playbook_id) = create_refs(&app).await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/tasks",
                Some(serde_json::json!({
                    "name": "Isolate ws-042",
                    "agent_id": agent_id,
                    "playbook_id": playbook_id
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "pending");
        assert_eq!(body["priority"], "medium");
        assert!(body["started_at"].is_null());
    }

    #[tokio::test]
    async fn test_create_task_with_dangling_playbook_is_rejected() {
        let (app, _state) = test_router().await;
        let (agent_id, _) = create_refs(&app).await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/tasks",
                Some(serde_json::json!({
                    "name": "Orphan",
                    "agent_id": agent_id,
                    "playbook_id": uuid::Uuid::new_v4()
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "REFERENCE_ERROR");
    }

    #[tokio::test]
    async fn test_status_lifecycle_over_http() {
        let (app, _state) = test_router().await;
        let (agent_id, playbook_id) = create_refs(&app).await;

        let created = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/tasks",
                    Some(serde_json::json!({
                        "name": "Contain",
                        "agent_id": agent_id,
                        "playbook_id": playbook_id
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        // pending -> completed is not allowed
        let skipped = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/tasks/{}", id),
                Some(serde_json::json!({"status": "completed"})),
            ))
            .await
            .unwrap();
        assert_eq!(skipped.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // pending -> running stamps started_at
        let running = body_json(
            app.clone()
                .oneshot(request(
                    "PUT",
                    &format!("/api/tasks/{}", id),
                    Some(serde_json::json!({"status": "running"})),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(running["status"], "running");
        assert!(running["started_at"].is_string());

        // running -> completed stamps completed_at and keeps the result
        let completed = body_json(
            app.oneshot(request(
                "PUT",
                &format!("/api/tasks/{}", id),
                Some(serde_json::json!({"status": "completed", "result": {"isolated": true}})),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(completed["status"], "completed");
        assert!(completed["completed_at"].is_string());
        assert_eq!(completed["result"]["isolated"], true);
    }
}
