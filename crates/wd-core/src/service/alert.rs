//! Alert service.

use super::ServiceError;
use crate::alert::{Alert, NewAlert};
use crate::db::{create_alert_repository, AlertRepository, AlertUpdate, DbPool};
use uuid::Uuid;

/// Plain CRUD over legacy alert records.
pub struct AlertService {
    alerts: Box<dyn AlertRepository>,
}

impl AlertService {
    /// Creates a service backed by the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self {
            alerts: create_alert_repository(pool),
        }
    }

    /// Records a new alert.
    pub async fn create(&self, new: NewAlert) -> Result<Alert, ServiceError> {
        let alert = Alert::new(new);
        Ok(self.alerts.create(&alert).await?)
    }

    /// Gets an alert by ID.
    pub async fn get(&self, id: Uuid) -> Result<Alert, ServiceError> {
        self.alerts
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Alert", id))
    }

    /// Lists all alerts.
    pub async fn list(&self) -> Result<Vec<Alert>, ServiceError> {
        Ok(self.alerts.list().await?)
    }

    /// Applies a partial update to an alert.
    pub async fn update(&self, id: Uuid, update: AlertUpdate) -> Result<Alert, ServiceError> {
        Ok(self.alerts.update(id, &update).await?)
    }

    /// Deletes an alert.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.alerts.delete(id).await? {
            return Err(ServiceError::not_found("Alert", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertType;
    use crate::db::testing::test_pool;
    use crate::incident::Severity;

    #[tokio::test]
    async fn test_crud_cycle() {
        let pool = test_pool().await;
        let service = AlertService::new(&pool);

        let alert = service
            .create(NewAlert {
                message: "Unauthorized access attempt".to_string(),
                alert_type: AlertType::UnauthorizedAccess,
                severity: Severity::High,
                slack_message_id: None,
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(alert.status, "pending");

        let updated = service
            .update(
                alert.id,
                AlertUpdate {
                    status: Some("acknowledged".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "acknowledged");

        service.delete(alert.id).await.unwrap();
        assert!(matches!(
            service.delete(alert.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
