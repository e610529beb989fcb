//! Notification repository for database operations.
//!
//! Notifications record delivery intent and are never updated after the
//! fact, so the repository only supports create, get, and list.

use super::{parse_timestamp, parse_uuid, DbError, DbPool};
use crate::notification::Notification;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for notification persistence.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persists a new notification record.
    async fn create(&self, notification: &Notification) -> Result<Notification, DbError>;

    /// Gets a notification by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Notification>, DbError>;

    /// Lists all notifications in creation order.
    async fn list(&self) -> Result<Vec<Notification>, DbError>;
}

/// SQLite implementation of [`NotificationRepository`].
pub struct SqliteNotificationRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification, DbError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, message, channel, kind, severity, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(notification.id.to_string())
        .bind(&notification.message)
        .bind(&notification.channel)
        .bind(&notification.kind)
        .bind(&notification.severity)
        .bind(notification.created_at.to_rfc3339())
        .bind(notification.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(notification.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>, DbError> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"SELECT id, message, channel, kind, severity, created_at, updated_at FROM notifications WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Notification::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Notification>, DbError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"SELECT id, message, channel, kind, severity, created_at, updated_at FROM notifications ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }
}

/// Factory function to create the notification repository for the given pool.
pub fn create_notification_repository(pool: &DbPool) -> Box<dyn NotificationRepository> {
    Box::new(SqliteNotificationRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: String,
    message: String,
    channel: Option<String>,
    kind: String,
    severity: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DbError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: parse_uuid(&row.id)?,
            message: row.message,
            channel: row.channel,
            kind: row.kind,
            severity: row.severity,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
