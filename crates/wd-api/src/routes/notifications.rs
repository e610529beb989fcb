//! Outbound notification endpoints.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use validator::Validate;

use crate::dto::{NotificationResponse, SendNotificationRequest};
use crate::error::ApiError;
use crate::state::AppState;
use wd_core::{NewNotification, NotificationService};
use wd_notify::NotificationRequest;

/// Creates notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/send", post(send_notification))
}

/// List persisted notification records.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "List of notifications", body = Vec<NotificationResponse>)
    ),
    tag = "Notifications"
)]
pub(crate) async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = NotificationService::new(&state.db).list().await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

/// Send a notification to the chat channel.
///
/// Exactly one delivery attempt is made. On success the notification is
/// persisted and returned; on failure the caller gets a 500 with a generic
/// message and nothing is persisted.
#[utoipa::path(
    post,
    path = "/api/notifications/send",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Notification delivered and persisted", body = NotificationResponse),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Delivery failed")
    ),
    tag = "Notifications"
)]
pub(crate) async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendNotificationRequest>,
) -> Result<Json<NotificationResponse>, ApiError> {
    request.validate()?;

    let mut outbound = NotificationRequest::new(request.message.clone());
    if let Some(channel) = &request.channel {
        outbound = outbound.with_channel(channel.clone());
    }
    if let Some(kind) = &request.kind {
        outbound = outbound.with_kind(kind.clone());
    }
    if let Some(severity) = &request.severity {
        outbound = outbound.with_severity(severity.clone());
    }

    if !state.notifier.send(&outbound).await {
        return Err(ApiError::DeliveryFailed);
    }

    let notification = NotificationService::new(&state.db)
        .create(NewNotification {
            message: request.message,
            channel: request.channel,
            kind: request.kind,
            severity: request.severity,
        })
        .await?;

    Ok(Json(notification.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::{body_json, request, test_router};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_send_uses_defaults_and_persists() {
        let (app, notifier) = test_router().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/notifications/send",
                Some(serde_json::json!({"message": "Critical incident opened", "severity": "critical"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["type"], "alert");
        assert_eq!(body["severity"], "critical");

        // The dispatcher saw the request with no channel override.
        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].request.severity, "critical");
        assert!(sent[0].request.channel.is_none());

        // The record was persisted.
        let listed = body_json(
            app.oneshot(request("GET", "/api/notifications", None))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_generic_500_and_persists_nothing() {
        let (app, notifier) = test_router().await;
        notifier.set_should_fail(true).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/notifications/send",
                Some(serde_json::json!({"message": "will not arrive"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "DELIVERY_FAILED");
        assert_eq!(body["message"], "Failed to deliver notification");

        let listed = body_json(
            app.oneshot(request("GET", "/api/notifications", None))
                .await
                .unwrap(),
        )
        .await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (app, _notifier) = test_router().await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/notifications/send",
                Some(serde_json::json!({"message": ""})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
