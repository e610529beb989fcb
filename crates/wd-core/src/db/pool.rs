//! Database connection pool management.
//!
//! Watchdesk persists to a single embedded SQLite store (the original
//! platform's default). Foreign keys are switched on for every connection so
//! the schema-level referential backstop actually fires.

use super::DbError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Handle to the Watchdesk database.
#[derive(Clone)]
pub struct DbPool {
    pool: SqlitePool,
}

/// Options for creating a database connection pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Maximum time to wait for a connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Self {
            max_connections,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Creates a database connection pool from a database URL.
///
/// Only `sqlite:` URLs are supported; anything else is rejected as a
/// configuration error. The database file is created when missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Creates a database connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    options: PoolOptions,
) -> Result<DbPool, DbError> {
    if !database_url.starts_with("sqlite:") {
        return Err(DbError::Configuration(format!(
            "Unsupported database URL scheme. Expected sqlite:, got: {}",
            database_url.split(':').next().unwrap_or("unknown")
        )));
    }

    info!("Creating SQLite connection pool");

    let connect_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| DbError::Configuration(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .min_connections(options.min_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect_with(connect_options)
        .await?;

    Ok(DbPool { pool })
}

impl DbPool {
    /// Returns the underlying sqlx pool for repository queries.
    pub(crate) fn sqlite(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Returns the current pool size.
    pub fn pool_size(&self) -> u32 {
        self.pool.size()
    }

    /// Returns the number of idle connections.
    pub fn idle_connections(&self) -> usize {
        self.pool.num_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_rejects_non_sqlite() {
        let result = create_pool("postgres://localhost/watchdesk").await;
        assert!(matches!(result, Err(DbError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_create_pool_in_memory() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        assert!(pool.is_healthy().await);
    }

    #[test]
    fn test_pool_options_default() {
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        let opts = PoolOptions::default();
        assert_eq!(opts.max_connections, 10);
        assert_eq!(opts.min_connections, 1);
    }
}
