//! Notification service.

use super::ServiceError;
use crate::db::{create_notification_repository, DbPool, NotificationRepository};
use crate::notification::{NewNotification, Notification};
use uuid::Uuid;

/// Persists delivery intent for outbound notifications.
///
/// Delivery itself happens before this service is involved; a record is
/// only written for attempts that succeeded.
pub struct NotificationService {
    notifications: Box<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            notifications: create_notification_repository(pool),
        }
    }

    /// Persists a notification record.
    pub async fn create(&self, new: NewNotification) -> Result<Notification, ServiceError> {
        let notification = Notification::new(new);
        Ok(self.notifications.create(&notification).await?)
    }

    /// Gets a notification by ID.
    pub async fn get(&self, id: Uuid) -> Result<Notification, ServiceError> {
        self.notifications
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))
    }

    /// Lists all notifications.
    pub async fn list(&self) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.notifications.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let pool = test_pool().await;
        let service = NotificationService::new(&pool);

        let notification = service
            .create(NewNotification {
                message: "Webhook test".to_string(),
                channel: None,
                kind: None,
                severity: None,
            })
            .await
            .unwrap();

        assert_eq!(notification.kind, "alert");
        assert_eq!(notification.severity, "medium");

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
