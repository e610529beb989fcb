//! Incident management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{CreateIncidentRequest, IncidentResponse, MessageResponse, UpdateIncidentRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::IncidentUpdate;
use wd_core::{IncidentService, NewIncident};

/// Creates incident routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_incidents).post(create_incident))
        .route(
            "/:id",
            get(get_incident).put(update_incident).delete(delete_incident),
        )
}

/// List all incidents.
#[utoipa::path(
    get,
    path = "/api/incidents",
    responses(
        (status = 200, description = "List of incidents", body = Vec<IncidentResponse>)
    ),
    tag = "Incidents"
)]
pub(crate) async fn list_incidents(
    State(state): State<AppState>,
) -> Result<Json<Vec<IncidentResponse>>, ApiError> {
    let incidents = IncidentService::new(&state.db).list().await?;
    Ok(Json(
        incidents.into_iter().map(IncidentResponse::from).collect(),
    ))
}

/// Open a new incident.
///
/// `agent_id` must reference an existing agent.
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident created", body = IncidentResponse),
        (status = 422, description = "Validation failed or reference does not resolve")
    ),
    tag = "Incidents"
)]
pub(crate) async fn create_incident(
    State(state): State<AppState>,
    Json(request): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
    request.validate()?;

    let incident = IncidentService::new(&state.db)
        .create(NewIncident {
            title: request.title,
            description: request.description,
            severity: request.severity,
            status: request.status,
            source: request.source,
            agent_id: request.agent_id,
            details: request.details.unwrap_or_else(|| serde_json::json!({})),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(incident.into())))
}

/// Get a single incident by ID.
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Incident details", body = IncidentResponse),
        (status = 404, description = "Incident not found")
    ),
    tag = "Incidents"
)]
pub(crate) async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IncidentResponse>, ApiError> {
    let incident = IncidentService::new(&state.db).get(id).await?;
    Ok(Json(incident.into()))
}

/// Update an incident.
///
/// `resolved_at` is maintained by the server: stamped when the status
/// enters resolved/closed and cleared when the incident is reopened.
#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident ID")),
    request_body = UpdateIncidentRequest,
    responses(
        (status = 200, description = "Updated incident", body = IncidentResponse),
        (status = 404, description = "Incident not found"),
        (status = 409, description = "Concurrent status change")
    ),
    tag = "Incidents"
)]
pub(crate) async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIncidentRequest>,
) -> Result<Json<IncidentResponse>, ApiError> {
    request.validate()?;

    let incident = IncidentService::new(&state.db)
        .update(
            id,
            IncidentUpdate {
                title: request.title,
                description: request.description,
                severity: request.severity,
                source: request.source,
                details: request.details,
                status: request.status,
                expected_status: None,
                resolved_at: None,
            },
        )
        .await?;

    Ok(Json(incident.into()))
}

/// Delete an incident.
#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident ID")),
    responses(
        (status = 200, description = "Incident deleted", body = MessageResponse),
        (status = 404, description = "Incident not found")
    ),
    tag = "Incidents"
)]
pub(crate) async fn delete_incident(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    IncidentService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Incident deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{body_json, request, test_router};
    use axum::http::StatusCode;
    use axum::Router;
    use tower::ServiceExt;

    async fn create_agent(app: &Router) -> String {
        let agent = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/agents",
                    Some(serde_json::json!({
                        "name": "Cloud Agent",
                        "agent_type": "cloud",
                        "status": "active",
                        "version": "1.0.0"
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        agent["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_with_missing_agent_is_rejected() {
        let (app, _state) = test_router().await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/incidents",
                Some(serde_json::json!({
                    "title": "Orphan incident",
                    "severity": "high",
                    "agent_id": uuid::Uuid::new_v4()
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "REFERENCE_ERROR");
    }

    #[tokio::test]
    async fn test_resolution_lifecycle_over_http() {
        let (app, _state) = test_router().await;
        let agent_id = create_agent(&app).await;

        let created = body_json(
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/incidents",
                    Some(serde_json::json!({
                        "title": "Suspicious login",
                        "severity": "medium",
                        "agent_id": agent_id,
                        "source": "cloudtrail"
                    })),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["status"], "open");
        assert!(created["resolved_at"].is_null());

        let in_progress = body_json(
            app.clone()
                .oneshot(request(
                    "PUT",
                    &format!("/api/incidents/{}", id),
                    Some(serde_json::json!({"status": "in_progress"})),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(in_progress["resolved_at"].is_null());

        let resolved = body_json(
            app.oneshot(request(
                "PUT",
                &format!("/api/incidents/{}", id),
                Some(serde_json::json!({"status": "resolved"})),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(resolved["status"], "resolved");
        assert!(resolved["resolved_at"].is_string());
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let (app, _state) = test_router().await;

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/api/incidents/{}", uuid::Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
