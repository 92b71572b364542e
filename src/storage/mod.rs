//! # Storage and Persistence
//!
//! Database connectivity and the persistence layer for users, sessions, and
//! the finance resources (categories, counterparties, transactions).

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool};
pub use repositories::{
    Category, CategoryRepository, Counterparty, CounterpartyRepository, NewCategory,
    NewCounterparty, NewTransaction, SessionRecord, SessionRepository, SqlxCategoryRepository,
    SqlxCounterpartyRepository, SqlxSessionRepository, SqlxTransactionRepository,
    SqlxUserRepository, Transaction, TransactionKind, TransactionRepository, UpdateCategory,
    UpdateCounterparty, UpdateTransaction, UserRepository,
};

use crate::errors::{Error, Result};

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| Error::Database {
        source: e,
        context: "Database connectivity check failed".to_string(),
    })?;

    Ok(())
}
