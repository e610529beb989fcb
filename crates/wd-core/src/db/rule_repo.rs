//! Rule repository for database operations.

use super::{parse_timestamp, parse_uuid, DbError, DbPool};
use crate::rule::{Rule, RuleType};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Partial update for a rule.
#[derive(Debug, Clone, Default)]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rule_type: Option<RuleType>,
    pub conditions: Option<serde_json::Value>,
    pub actions: Option<Vec<serde_json::Value>>,
    pub is_active: Option<bool>,
}

/// Repository trait for rule persistence.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Persists a new rule.
    async fn create(&self, rule: &Rule) -> Result<Rule, DbError>;

    /// Gets a rule by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Rule>, DbError>;

    /// Lists all rules in creation order.
    async fn list(&self) -> Result<Vec<Rule>, DbError>;

    /// Merges the given fields into an existing rule.
    async fn update(&self, id: Uuid, update: &RuleUpdate) -> Result<Rule, DbError>;

    /// Deletes a rule, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

/// SQLite implementation of [`RuleRepository`].
pub struct SqliteRuleRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteRuleRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for SqliteRuleRepository {
    async fn create(&self, rule: &Rule) -> Result<Rule, DbError> {
        let conditions = serde_json::to_string(&rule.conditions)?;
        let actions = serde_json::to_string(&rule.actions)?;

        sqlx::query(
            r#"
            INSERT INTO rules (id, name, description, rule_type, conditions, actions, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(rule.id.to_string())
        .bind(&rule.name)
        .bind(&rule.description)
        .bind(rule.rule_type.as_db_str())
        .bind(&conditions)
        .bind(&actions)
        .bind(rule.is_active)
        .bind(rule.created_at.to_rfc3339())
        .bind(rule.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(rule.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Rule>, DbError> {
        let row: Option<RuleRow> = sqlx::query_as(
            r#"SELECT id, name, description, rule_type, conditions, actions, is_active, created_at, updated_at FROM rules WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Rule::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Rule>, DbError> {
        let rows: Vec<RuleRow> = sqlx::query_as(
            r#"SELECT id, name, description, rule_type, conditions, actions, is_active, created_at, updated_at FROM rules ORDER BY created_at ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Rule::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: &RuleUpdate) -> Result<Rule, DbError> {
        let conditions = update
            .conditions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let actions = update
            .actions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE rules SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                rule_type = COALESCE(?, rule_type),
                conditions = COALESCE(?, conditions),
                actions = COALESCE(?, actions),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.rule_type.map(|t| t.as_db_str()))
        .bind(&conditions)
        .bind(&actions)
        .bind(update.is_active)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Rule", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Rule", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM rules WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Factory function to create the rule repository for the given pool.
pub fn create_rule_repository(pool: &DbPool) -> Box<dyn RuleRepository> {
    Box::new(SqliteRuleRepository::new(pool.sqlite().clone()))
}

#[derive(sqlx::FromRow)]
struct RuleRow {
    id: String,
    name: String,
    description: String,
    rule_type: String,
    conditions: String,
    actions: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RuleRow> for Rule {
    type Error = DbError;

    fn try_from(row: RuleRow) -> Result<Self, Self::Error> {
        let rule_type = RuleType::from_db_str(&row.rule_type)
            .ok_or_else(|| DbError::Serialization(format!("invalid rule_type: {}", row.rule_type)))?;

        Ok(Rule {
            id: parse_uuid(&row.id)?,
            name: row.name,
            description: row.description,
            rule_type,
            conditions: serde_json::from_str(&row.conditions)?,
            actions: serde_json::from_str(&row.actions)?,
            is_active: row.is_active,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
