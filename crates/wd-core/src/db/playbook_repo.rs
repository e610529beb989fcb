//! Playbook repository for database operations.

use super::{parse_timestamp, parse_uuid, DbError, DbPool};
use crate::playbook::{Playbook, PlaybookStep};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Partial update for a playbook.
#[derive(Debug, Clone, Default)]
pub struct PlaybookUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub steps: Option<Vec<PlaybookStep>>,
    /// `Some(None)` clears the parameter schema; `None` leaves it untouched.
    pub parameters: Option<Option<serde_json::Value>>,
}

/// Repository trait for playbook persistence.
#[async_trait]
pub trait PlaybookRepository: Send + Sync {
    /// Persists a new playbook.
    async fn create(&self, playbook: &Playbook) -> Result<Playbook, DbError>;

    /// Gets a playbook by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Playbook>, DbError>;

    /// Lists all playbooks in creation order.
    async fn list(&self) -> Result<Vec<Playbook>, DbError>;

    /// Merges the given fields into an existing playbook.
    async fn update(&self, id: Uuid, update: &PlaybookUpdate) -> Result<Playbook, DbError>;

    /// Deletes a playbook, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

/// SQLite implementation of [`PlaybookRepository`].
pub struct SqlitePlaybookRepository {
    pool: sqlx::SqlitePool,
}

impl SqlitePlaybookRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaybookRepository for SqlitePlaybookRepository {
    async fn create(&self, playbook: &Playbook) -> Result<Playbook, DbError> {
        let steps = serde_json::to_string(&playbook.steps)?;
        let parameters = playbook
            .parameters
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO playbooks (id, name, description, version, steps, parameters, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(playbook.id.to_string())
        .bind(&playbook.name)
        .bind(&playbook.description)
        .bind(&playbook.version)
        .bind(&steps)
        .bind(&parameters)
        .bind(playbook.created_at.to_rfc3339())
        .bind(playbook.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(playbook.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Playbook>, DbError> {
        let row: Option<PlaybookRow> = sqlx::query_as(
            r#"SELECT id, name, description, version, steps, parameters, created_at, updated_at FROM playbooks WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Playbook::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Playbook>, DbError> {
        let rows: Vec<PlaybookRow> = sqlx::query_as(
            r#"SELECT id, name, description, version, steps, parameters, created_at, updated_at FROM playbooks ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Playbook::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &PlaybookUpdate) -> Result<Playbook, DbError> {
        let steps = update.steps.as_ref().map(serde_json::to_string).transpose()?;
        let parameters = update
            .parameters
            .as_ref()
            .and_then(|p| p.as_ref())
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE playbooks SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                version = COALESCE(?, version),
                steps = COALESCE(?, steps),
                parameters = CASE WHEN ? THEN ? ELSE parameters END,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.version)
        .bind(&steps)
        .bind(update.parameters.is_some())
        .bind(&parameters)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Playbook", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Playbook", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM playbooks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the playbook repository for the given pool.
pub fn create_playbook_repository(pool: &DbPool) -> Box<dyn PlaybookRepository> {
    Box::new(SqlitePlaybookRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct PlaybookRow {
    id: String,
    name: String,
    description: String,
    version: String,
    steps: String,
    parameters: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PlaybookRow> for Playbook {
    type Error = DbError;

    fn try_from(row: PlaybookRow) -> Result<Self, Self::Error> {
        Ok(Playbook {
            id: parse_uuid(&row.id)?,
            name: row.name,
            description: row.description,
            version: row.version,
            steps: serde_json::from_str(&row.steps)?,
            parameters: row
                .parameters
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::playbook::NewPlaybook;

    fn sample_playbook() -> Playbook {
        Playbook::new(NewPlaybook {
            name: "Malware Detection Response".to_string(),
            description: "Standard response to malware detection".to_string(),
            version: "1.0.0".to_string(),
            steps: vec![PlaybookStep {
                name: "Scan for malware".to_string(),
                action: "scan".to_string(),
                parameters: serde_json::json!({"scan_type": "full"}),
            }],
            parameters: None,
        })
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let pool = test_pool().await;
        let repo = create_playbook_repository(&pool);

        let playbook = sample_playbook();
        repo.create(&playbook).await.unwrap();

        let fetched = repo.get(playbook.id).await.unwrap().unwrap();
        assert_eq!(fetched, playbook);
    }

    #[tokio::test]
    async fn test_update_replaces_steps() {
        let pool = test_pool().await;
        let repo = create_playbook_repository(&pool);

        let playbook = sample_playbook();
        repo.create(&playbook).await.unwrap();

        let new_steps = vec![
            PlaybookStep {
                name: "Isolate affected system".to_string(),
                action: "isolate".to_string(),
                parameters: serde_json::json!({"duration": 3600}),
            },
            PlaybookStep {
                name: "Collect logs".to_string(),
                action: "collect_logs".to_string(),
                parameters: serde_json::json!({"log_types": ["system"]}),
            },
        ];

        let updated = repo
            .update(
                playbook.id,
                &PlaybookUpdate {
                    steps: Some(new_steps.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.steps, new_steps);
        assert_eq!(updated.name, playbook.name);
    }

    #[tokio::test]
    async fn test_update_missing_returns_not_found() {
        let pool = test_pool().await;
        let repo = create_playbook_repository(&pool);

        let result = repo
            .update(Uuid::new_v4(), &PlaybookUpdate::default())
            .await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_semantics() {
        let pool = test_pool().await;
        let repo = create_playbook_repository(&pool);

        let playbook = sample_playbook();
        repo.create(&playbook).await.unwrap();

        assert!(repo.delete(playbook.id).await.unwrap());
        assert!(!repo.delete(playbook.id).await.unwrap());
    }
}
