//! # Database Migration Management
//!
//! Schema evolution via SQL migrations embedded in the binary and executed
//! automatically on startup when `auto_migrate` is enabled.

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use tracing::info;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| Error::internal(format!("Failed to run database migrations: {}", e)))?;

    info!("Database migrations applied");
    Ok(())
}
