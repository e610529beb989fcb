//! Task repository for database operations.
//!
//! Status changes are written with a compare-and-swap guard: the UPDATE only
//! applies while the row still holds the status the caller validated against,
//! so two racing writers cannot interleave an invalid transition.

use super::{parse_opt_timestamp, parse_timestamp, parse_uuid, DbError, DbPool};
use crate::task::{Task, TaskPriority, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Partial update for a task.
///
/// `agent_id` and `playbook_id` are fixed at creation; a task stays bound to
/// the agent and playbook it was created for.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub parameters: Option<serde_json::Value>,
    /// `Some(None)` clears the column; `None` leaves it untouched.
    pub result: Option<Option<serde_json::Value>>,
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    /// New status. Requires `expected_status` so the write is guarded.
    pub status: Option<TaskStatus>,
    /// Status the row must still hold for a status change to apply.
    pub expected_status: Option<TaskStatus>,
}

/// Repository trait for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new task.
    async fn create(&self, task: &Task) -> Result<Task, DbError>;

    /// Gets a task by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Task>, DbError>;

    /// Lists all tasks in creation order.
    async fn list(&self) -> Result<Vec<Task>, DbError>;

    /// Merges the given fields into an existing task.
    ///
    /// Returns `DbError::Conflict` when a guarded status change loses the
    /// race against a concurrent writer.
    async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<Task, DbError>;

    /// Deletes a task, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;

    /// Counts tasks referencing the given agent.
    async fn count_by_agent(&self, agent_id: Uuid) -> Result<u64, DbError>;

    /// Counts tasks referencing the given playbook.
    async fn count_by_playbook(&self, playbook_id: Uuid) -> Result<u64, DbError>;
}

/// SQLite implementation of [`TaskRepository`].
pub struct SqliteTaskRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: &Task) -> Result<Task, DbError> {
        let parameters = serde_json::to_string(&task.parameters)?;
        let result = task.result.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, description, status, priority, agent_id, playbook_id, parameters, result, started_at, completed_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.status.as_db_str())
        .bind(task.priority.as_db_str())
        .bind(task.agent_id.to_string())
        .bind(task.playbook_id.to_string())
        .bind(&parameters)
        .bind(&result)
        .bind(task.started_at.map(|t| t.to_rfc3339()))
        .bind(task.completed_at.map(|t| t.to_rfc3339()))
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(task.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, DbError> {
        let row: Option<TaskRow> = sqlx::query_as(
            r#"SELECT id, name, description, status, priority, agent_id, playbook_id, parameters, result, started_at, completed_at, created_at, updated_at FROM tasks WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Task>, DbError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"SELECT id, name, description, status, priority, agent_id, playbook_id, parameters, result, started_at, completed_at, created_at, updated_at FROM tasks ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<Task, DbError> {
        let parameters = update
            .parameters
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let result_json = update
            .result
            .as_ref()
            .and_then(|r| r.as_ref())
            .map(serde_json::to_string)
            .transpose()?;
        let expected = update.expected_status.map(|s| s.as_db_str());

        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                priority = COALESCE(?, priority),
                parameters = COALESCE(?, parameters),
                result = CASE WHEN ? THEN ? ELSE result END,
                started_at = CASE WHEN ? THEN ? ELSE started_at END,
                completed_at = CASE WHEN ? THEN ? ELSE completed_at END,
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND (? IS NULL OR status = ?)
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.priority.map(|p| p.as_db_str()))
        .bind(&parameters)
        .bind(update.result.is_some())
        .bind(&result_json)
        .bind(update.started_at.is_some())
        .bind(update.started_at.flatten().map(|t| t.to_rfc3339()))
        .bind(update.completed_at.is_some())
        .bind(update.completed_at.flatten().map(|t| t.to_rfc3339()))
        .bind(update.status.map(|s| s.as_db_str()))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(expected)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get(id).await? {
                Some(_) => Err(DbError::Conflict(format!(
                    "task {} status changed concurrently",
                    id
                ))),
                None => Err(DbError::not_found("Task", id)),
            };
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Task", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_agent(&self, agent_id: Uuid) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE agent_id = ?")
            .bind(agent_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn count_by_playbook(&self, playbook_id: Uuid) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE playbook_id = ?")
            .bind(playbook_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}

/// Factory function to create the task repository for the given pool.
pub fn create_task_repository(pool: &DbPool) -> Box<dyn TaskRepository> {
    Box::new(SqliteTaskRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    name: String,
    description: String,
    status: String,
    priority: String,
    agent_id: String,
    playbook_id: String,
    parameters: String,
    result: Option<String>,
    started_at: Option<String>,
    completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DbError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::from_db_str(&row.status)
            .ok_or_else(|| DbError::Serialization(format!("invalid task status: {}", row.status)))?;
        let priority = TaskPriority::from_db_str(&row.priority).ok_or_else(|| {
            DbError::Serialization(format!("invalid task priority: {}", row.priority))
        })?;

        Ok(Task {
            id: parse_uuid(&row.id)?,
            name: row.name,
            description: row.description,
            status,
            priority,
            agent_id: parse_uuid(&row.agent_id)?,
            playbook_id: parse_uuid(&row.playbook_id)?,
            parameters: serde_json::from_str(&row.parameters)?,
            result: row.result.as_deref().map(serde_json::from_str).transpose()?,
            started_at: parse_opt_timestamp(row.started_at.as_deref())?,
            completed_at: parse_opt_timestamp(row.completed_at.as_deref())?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
