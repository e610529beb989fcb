//! Agent repository for database operations.

use super::{parse_opt_timestamp, parse_timestamp, parse_uuid, DbError, DbPool};
use crate::agent::{Agent, AgentStatus, AgentType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Partial update for an agent.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub agent_type: Option<AgentType>,
    pub status: Option<AgentStatus>,
    pub version: Option<String>,
    pub is_active: Option<bool>,
    /// `Some(None)` clears the column; `None` leaves it untouched.
    pub last_seen: Option<Option<DateTime<Utc>>>,
    pub configuration: Option<serde_json::Value>,
}

/// Repository trait for agent persistence.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Persists a new agent.
    async fn create(&self, agent: &Agent) -> Result<Agent, DbError>;

    /// Gets an agent by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Agent>, DbError>;

    /// Lists all agents in creation order.
    async fn list(&self) -> Result<Vec<Agent>, DbError>;

    /// Merges the given fields into an existing agent.
    async fn update(&self, id: Uuid, update: &AgentUpdate) -> Result<Agent, DbError>;

    /// Deletes an agent, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

/// SQLite implementation of [`AgentRepository`].
pub struct SqliteAgentRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteAgentRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, agent: &Agent) -> Result<Agent, DbError> {
        let configuration = serde_json::to_string(&agent.configuration)?;

        sqlx::query(
            r#"
            INSERT INTO agents (id, name, agent_type, status, version, is_active, last_seen, configuration, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(agent.id.to_string())
        .bind(&agent.name)
        .bind(agent.agent_type.as_db_str())
        .bind(agent.status.as_db_str())
        .bind(&agent.version)
        .bind(agent.is_active)
        .bind(agent.last_seen.map(|t| t.to_rfc3339()))
        .bind(&configuration)
        .bind(agent.created_at.to_rfc3339())
        .bind(agent.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(agent.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Agent>, DbError> {
        let row: Option<AgentRow> = sqlx::query_as(
            r#"SELECT id, name, agent_type, status, version, is_active, last_seen, configuration, created_at, updated_at FROM agents WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Agent::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Agent>, DbError> {
        let rows: Vec<AgentRow> = sqlx::query_as(
            r#"SELECT id, name, agent_type, status, version, is_active, last_seen, configuration, created_at, updated_at FROM agents ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Agent::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &AgentUpdate) -> Result<Agent, DbError> {
        let configuration = update
            .configuration
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE agents SET
                name = COALESCE(?, name),
                agent_type = COALESCE(?, agent_type),
                status = COALESCE(?, status),
                version = COALESCE(?, version),
                is_active = COALESCE(?, is_active),
                last_seen = CASE WHEN ? THEN ? ELSE last_seen END,
                configuration = COALESCE(?, configuration),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.agent_type.map(|t| t.as_db_str()))
        .bind(update.status.map(|s| s.as_db_str()))
        .bind(&update.version)
        .bind(update.is_active)
        .bind(update.last_seen.is_some())
        .bind(update.last_seen.flatten().map(|t| t.to_rfc3339()))
        .bind(&configuration)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Agent", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Agent", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the agent repository for the given pool.
pub fn create_agent_repository(pool: &DbPool) -> Box<dyn AgentRepository> {
    Box::new(SqliteAgentRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: String,
    name: String,
    agent_type: String,
    status: String,
    version: String,
    is_active: bool,
    last_seen: Option<String>,
    configuration: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AgentRow> for Agent {
    type Error = DbError;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        let agent_type = AgentType::from_db_str(&row.agent_type)
            .ok_or_else(|| DbError::Serialization(format!("invalid agent_type: {}", row.agent_type)))?;
        let status = AgentStatus::from_db_str(&row.status)
            .ok_or_else(|| DbError::Serialization(format!("invalid agent status: {}", row.status)))?;

        Ok(Agent {
            id: parse_uuid(&row.id)?,
            name: row.name,
            agent_type,
            status,
            version: row.version,
            is_active: row.is_active,
            last_seen: parse_opt_timestamp(row.last_seen.as_deref())?,
            configuration: serde_json::from_str(&row.configuration)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
