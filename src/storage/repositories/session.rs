//! Session repository: the single refresh-token slot per user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// The persisted refresh-token slot for one user.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub user_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Refresh-token persistence contract, keyed by user ID. The uniqueness of
/// `user_id` is enforced by the schema; `rotate` and `delete` report
/// `NotFound` when no row was touched.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch the session record for a user, if any
    async fn get(&self, user_id: i64) -> Result<Option<SessionRecord>>;

    /// Check whether a session record exists for a user
    async fn exists(&self, user_id: i64) -> Result<bool>;

    /// Insert the first session record for a user; violates the unique key
    /// if one already exists (callers check `exists` first)
    async fn create(&self, user_id: i64, token: &str) -> Result<()>;

    /// Overwrite the stored refresh token for a user
    async fn rotate(&self, user_id: i64, token: &str) -> Result<()>;

    /// Remove the session record for a user
    async fn delete(&self, user_id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxSessionRepository {
    pool: DbPool,
}

impl SqlxSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    #[instrument(skip(self), fields(user_id = user_id), name = "db_get_session")]
    async fn get(&self, user_id: i64) -> Result<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRecord>(
            "SELECT user_id, token, created_at FROM refresh_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch session record"))?;

        Ok(row)
    }

    #[instrument(skip(self), fields(user_id = user_id), name = "db_session_exists")]
    async fn exists(&self, user_id: i64) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT user_id FROM refresh_tokens WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|err| Error::database(err, "Failed to check session record"))?;

        Ok(row.is_some())
    }

    #[instrument(skip(self, token), fields(user_id = user_id), name = "db_create_session")]
    async fn create(&self, user_id: i64, token: &str) -> Result<()> {
        sqlx::query("INSERT INTO refresh_tokens (user_id, token) VALUES ($1, $2)")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to create session record"))?;

        Ok(())
    }

    #[instrument(skip(self, token), fields(user_id = user_id), name = "db_rotate_session")]
    async fn rotate(&self, user_id: i64, token: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET token = $1, created_at = now() WHERE user_id = $2",
        )
        .bind(token)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to rotate session record"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("session", user_id));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = user_id), name = "db_delete_session")]
    async fn delete(&self, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete session record"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("session", user_id));
        }

        Ok(())
    }
}
