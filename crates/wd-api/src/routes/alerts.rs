//! Alert endpoints (legacy model).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{AlertResponse, CreateAlertRequest, MessageResponse, UpdateAlertRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::db::AlertUpdate;
use wd_core::{AlertService, NewAlert};

/// Creates alert routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(create_alert))
        .route("/:id", get(get_alert).put(update_alert).delete(delete_alert))
}

/// List all alerts.
#[utoipa::path(
    get,
    path = "/api/alerts",
    responses(
        (status = 200, description = "List of alerts", body = Vec<AlertResponse>)
    ),
    tag = "Alerts"
)]
pub(crate) async fn list_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let alerts = AlertService::new(&state.db).list().await?;
    Ok(Json(alerts.into_iter().map(AlertResponse::from).collect()))
}

/// Record a new alert.
#[utoipa::path(
    post,
    path = "/api/alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert recorded", body = AlertResponse),
        (status = 422, description = "Validation failed")
    ),
    tag = "Alerts"
)]
pub(crate) async fn create_alert(
    State(state): State<AppState>,
    Json(request): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<AlertResponse>), ApiError> {
    request.validate()?;

    let alert = AlertService::new(&state.db)
        .create(NewAlert {
            message: request.message,
            alert_type: request.alert_type,
            severity: request.severity,
            slack_message_id: request.slack_message_id,
            status: request.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(alert.into())))
}

/// Get a single alert by ID.
#[utoipa::path(
    get,
    path = "/api/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert details", body = AlertResponse),
        (status = 404, description = "Alert not found")
    ),
    tag = "Alerts"
)]
pub(crate) async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = AlertService::new(&state.db).get(id).await?;
    Ok(Json(alert.into()))
}

/// Update an alert.
#[utoipa::path(
    put,
    path = "/api/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert ID")),
    request_body = UpdateAlertRequest,
    responses(
        (status = 200, description = "Updated alert", body = AlertResponse),
        (status = 404, description = "Alert not found")
    ),
    tag = "Alerts"
)]
pub(crate) async fn update_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    request.validate()?;

    let alert = AlertService::new(&state.db)
        .update(
            id,
            AlertUpdate {
                message: request.message,
                alert_type: request.alert_type,
                severity: request.severity,
                slack_message_id: request.slack_message_id.map(Some),
                status: request.status,
            },
        )
        .await?;

    Ok(Json(alert.into()))
}

/// Delete an alert.
#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert deleted", body = MessageResponse),
        (status = 404, description = "Alert not found")
    ),
    tag = "Alerts"
)]
pub(crate) async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    AlertService::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Alert deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{body_json, request, test_router};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_alert_defaults_to_pending() {
        let (app, _state) = test_router().await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/alerts",
                Some(serde_json::json!({
                    "message": "Malware signature matched",
                    "alert_type": "malware",
                    "severity": "critical"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "pending");
        assert!(body["slack_message_id"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_alert_type_is_rejected() {
        let (app, _state) = test_router().await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/alerts",
                Some(serde_json::json!({
                    "message": "x",
                    "alert_type": "noise",
                    "severity": "low"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
