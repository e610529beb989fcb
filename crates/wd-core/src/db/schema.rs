//! Database schema and migrations.

use super::{DbError, DbPool};
use tracing::info;

/// Runs database migrations, creating all tables if absent.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Running SQLite migrations");
    sqlx::migrate!("src/db/migrations").run(pool.sqlite()).await?;
    info!("Migrations completed successfully");
    Ok(())
}
