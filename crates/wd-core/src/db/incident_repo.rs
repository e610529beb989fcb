//! Incident repository for database operations.
//!
//! Like tasks, incident status changes use a compare-and-swap guard so the
//! `resolved_at` bookkeeping stays consistent under concurrent writers.

use super::{parse_opt_timestamp, parse_timestamp, parse_uuid, DbError, DbPool};
use crate::incident::{Incident, IncidentStatus, Severity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Partial update for an incident.
///
/// `agent_id` is fixed at creation; an incident stays attributed to the
/// agent that detected it.
#[derive(Debug, Clone, Default)]
pub struct IncidentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub source: Option<String>,
    pub details: Option<serde_json::Value>,
    /// New status. Requires `expected_status` so the write is guarded.
    pub status: Option<IncidentStatus>,
    /// Status the row must still hold for a status change to apply.
    pub expected_status: Option<IncidentStatus>,
    /// `Some(None)` clears the column; set by the service alongside `status`.
    pub resolved_at: Option<Option<DateTime<Utc>>>,
}

/// Repository trait for incident persistence.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Persists a new incident.
    async fn create(&self, incident: &Incident) -> Result<Incident, DbError>;

    /// Gets an incident by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Incident>, DbError>;

    /// Lists all incidents in creation order.
    async fn list(&self) -> Result<Vec<Incident>, DbError>;

    /// Merges the given fields into an existing incident.
    ///
    /// Returns `DbError::Conflict` when a guarded status change loses the
    /// race against a concurrent writer.
    async fn update(&self, id: Uuid, update: &IncidentUpdate) -> Result<Incident, DbError>;

    /// Deletes an incident, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;

    /// Counts incidents attributed to the given agent.
    async fn count_by_agent(&self, agent_id: Uuid) -> Result<u64, DbError>;
}

/// SQLite implementation of [`IncidentRepository`].
pub struct SqliteIncidentRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteIncidentRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentRepository for SqliteIncidentRepository {
    async fn create(&self, incident: &Incident) -> Result<Incident, DbError> {
        let details = serde_json::to_string(&incident.details)?;

        sqlx::query(
            r#"
            INSERT INTO incidents (id, title, description, severity, status, source, agent_id, details, resolved_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(incident.id.to_string())
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.severity.as_db_str())
        .bind(incident.status.as_db_str())
        .bind(&incident.source)
        .bind(incident.agent_id.to_string())
        .bind(&details)
        .bind(incident.resolved_at.map(|t| t.to_rfc3339()))
        .bind(incident.created_at.to_rfc3339())
        .bind(incident.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(incident.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Incident>, DbError> {
        let row: Option<IncidentRow> = sqlx::query_as(
            r#"SELECT id, title, description, severity, status, source, agent_id, details, resolved_at, created_at, updated_at FROM incidents WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Incident::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Incident>, DbError> {
        let rows: Vec<IncidentRow> = sqlx::query_as(
            r#"SELECT id, title, description, severity, status, source, agent_id, details, resolved_at, created_at, updated_at FROM incidents ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Incident::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &IncidentUpdate) -> Result<Incident, DbError> {
        let details = update
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let expected = update.expected_status.map(|s| s.as_db_str());

        let result = sqlx::query(
            r#"
            UPDATE incidents SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                severity = COALESCE(?, severity),
                source = COALESCE(?, source),
                details = COALESCE(?, details),
                status = COALESCE(?, status),
                resolved_at = CASE WHEN ? THEN ? ELSE resolved_at END,
                updated_at = ?
            WHERE id = ? AND (? IS NULL OR status = ?)
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.severity.map(|s| s.as_db_str()))
        .bind(&update.source)
        .bind(&details)
        .bind(update.status.map(|s| s.as_db_str()))
        .bind(update.resolved_at.is_some())
        .bind(update.resolved_at.flatten().map(|t| t.to_rfc3339()))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(expected)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get(id).await? {
                Some(_) => Err(DbError::Conflict(format!(
                    "incident {} status changed concurrently",
                    id
                ))),
                None => Err(DbError::not_found("Incident", id)),
            };
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Incident", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_agent(&self, agent_id: Uuid) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents WHERE agent_id = ?")
            .bind(agent_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}

/// Factory function to create the incident repository for the given pool.
pub fn create_incident_repository(pool: &DbPool) -> Box<dyn IncidentRepository> {
    Box::new(SqliteIncidentRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: String,
    title: String,
    description: String,
    severity: String,
    status: String,
    source: String,
    agent_id: String,
    details: String,
    resolved_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<IncidentRow> for Incident {
    type Error = DbError;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        let severity = Severity::from_db_str(&row.severity)
            .ok_or_else(|| DbError::Serialization(format!("invalid severity: {}", row.severity)))?;
        let status = IncidentStatus::from_db_str(&row.status).ok_or_else(|| {
            DbError::Serialization(format!("invalid incident status: {}", row.status))
        })?;

        Ok(Incident {
            id: parse_uuid(&row.id)?,
            title: row.title,
            description: row.description,
            severity,
            status,
            source: row.source,
            agent_id: parse_uuid(&row.agent_id)?,
            details: serde_json::from_str(&row.details)?,
            resolved_at: parse_opt_timestamp(row.resolved_at.as_deref())?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
