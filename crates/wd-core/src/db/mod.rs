//! Database layer for Watchdesk.
//!
//! This module provides persistence for every tracked entity using SQLx over
//! an embedded SQLite store. Each entity has a repository trait, a SQLite
//! implementation, and a factory function that wires it to the shared pool.

mod error;
mod pool;
mod schema;

pub mod agent_repo;
pub mod alert_repo;
pub mod incident_repo;
pub mod notification_repo;
pub mod playbook_repo;
pub mod rule_repo;
pub mod seed;
pub mod task_repo;

pub use error::DbError;
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use schema::run_migrations;

// Re-export repository traits and update types
pub use agent_repo::{AgentRepository, AgentUpdate};
pub use alert_repo::{AlertRepository, AlertUpdate};
pub use incident_repo::{IncidentRepository, IncidentUpdate};
pub use notification_repo::NotificationRepository;
pub use playbook_repo::{PlaybookRepository, PlaybookUpdate};
pub use rule_repo::{RuleRepository, RuleUpdate};
pub use task_repo::{TaskRepository, TaskUpdate};

// Re-export factory functions
pub use agent_repo::create_agent_repository;
pub use alert_repo::create_alert_repository;
pub use incident_repo::create_incident_repository;
pub use notification_repo::create_notification_repository;
pub use playbook_repo::create_playbook_repository;
pub use rule_repo::create_rule_repository;
pub use task_repo::create_task_repository;

pub use seed::seed_demo_data;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Parses a stored UUID column.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Serialization(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::Serialization(e.to_string()))
}

/// Parses a nullable RFC 3339 timestamp column.
pub(crate) fn parse_opt_timestamp(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DbError> {
    s.map(parse_timestamp).transpose()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::time::Duration;

    /// Creates an isolated in-memory database with the schema applied.
    pub(crate) async fn test_pool() -> DbPool {
        let url = format!(
            "sqlite:file:wdtest_{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let options = PoolOptions {
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = create_pool_with_options(&url, options)
            .await
            .expect("create test pool");
        run_migrations(&pool).await.expect("run migrations");
        pool
    }
}
