//! Alert repository for database operations.

use super::{parse_timestamp, parse_uuid, DbError, DbPool};
use crate::alert::{Alert, AlertType};
use crate::incident::Severity;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Partial update for an alert.
#[derive(Debug, Clone, Default)]
pub struct AlertUpdate {
    pub message: Option<String>,
    pub alert_type: Option<AlertType>,
    pub severity: Option<Severity>,
    /// `Some(None)` clears the delivery reference; `None` leaves it untouched.
    pub slack_message_id: Option<Option<String>>,
    pub status: Option<String>,
}

/// Repository trait for alert persistence.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Persists a new alert.
    async fn create(&self, alert: &Alert) -> Result<Alert, DbError>;

    /// Gets an alert by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Alert>, DbError>;

    /// Lists all alerts in creation order.
    async fn list(&self) -> Result<Vec<Alert>, DbError>;

    /// Merges the given fields into an existing alert.
    async fn update(&self, id: Uuid, update: &AlertUpdate) -> Result<Alert, DbError>;

    /// Deletes an alert, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

/// SQLite implementation of [`AlertRepository`].
pub struct SqliteAlertRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteAlertRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertRepository for SqliteAlertRepository {
    async fn create(&self, alert: &Alert) -> Result<Alert, DbError> {
        sqlx::query(
            r#"
            INSERT INTO alerts (id, message, alert_type, severity, slack_message_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(alert.id.to_string())
        .bind(&alert.message)
        .bind(alert.alert_type.as_db_str())
        .bind(alert.severity.as_db_str())
        .bind(&alert.slack_message_id)
        .bind(&alert.status)
        .bind(alert.created_at.to_rfc3339())
        .bind(alert.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(alert.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Alert>, DbError> {
        let row: Option<AlertRow> = sqlx::query_as(
            r#"SELECT id, message, alert_type, severity, slack_message_id, status, created_at, updated_at FROM alerts WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Alert::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Alert>, DbError> {
        let rows: Vec<AlertRow> = sqlx::query_as(
            r#"SELECT id, message, alert_type, severity, slack_message_id, status, created_at, updated_at FROM alerts ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &AlertUpdate) -> Result<Alert, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE alerts SET
                message = COALESCE(?, message),
                alert_type = COALESCE(?, alert_type),
                severity = COALESCE(?, severity),
                slack_message_id = CASE WHEN ? THEN ? ELSE slack_message_id END,
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.message)
        .bind(update.alert_type.map(|t| t.as_db_str()))
        .bind(update.severity.map(|s| s.as_db_str()))
        .bind(update.slack_message_id.is_some())
        .bind(update.slack_message_id.clone().flatten())
        .bind(&update.status)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Alert", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Alert", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the alert repository for the given pool.
pub fn create_alert_repository(pool: &DbPool) -> Box<dyn AlertRepository> {
    Box::new(SqliteAlertRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct AlertRow {
    id: String,
    message: String,
    alert_type: String,
    severity: String,
    slack_message_id: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AlertRow> for Alert {
    type Error = DbError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let alert_type = AlertType::from_db_str(&row.alert_type)
            .ok_or_else(|| DbError::Serialization(format!("invalid alert_type: {}", row.alert_type)))?;
        let severity = Severity::from_db_str(&row.severity)
            .ok_or_else(|| DbError::Serialization(format!("invalid severity: {}", row.severity)))?;

        Ok(Alert {
            id: parse_uuid(&row.id)?,
            message: row.message,
            alert_type,
            severity,
            slack_message_id: row.slack_message_id,
            status: row.status,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
