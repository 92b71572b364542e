//! User repository: lookups for authentication plus admin-facing CRUD.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

use crate::auth::user::{NewUser, UpdateUser, User, UserInfo};
use crate::errors::{Error, Result};
use crate::storage::DbPool;

use super::{map_constraint_error, page_offset};

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub email_confirmed: bool,
    pub password_hash: String,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            login: row.login,
            email: row.email,
            email_confirmed: row.email_confirmed,
            password_hash: row.password_hash,
            role_id: row.role_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// User directory contract. The auth service needs the by-email lookup and
/// creation; the users resource service uses the rest.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users with pagination and a case-insensitive substring search
    /// over login and email.
    async fn list_users(&self, page: i64, limit: i64, search: &str) -> Result<Vec<UserInfo>>;

    /// Get a user's public view by ID
    async fn get_user(&self, id: i64) -> Result<Option<UserInfo>>;

    /// Get a full user record (including password hash) by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a new user; the schema default assigns the regular role
    async fn create_user(&self, user: NewUser) -> Result<()>;

    /// Update login/email for an existing user
    async fn update_user(&self, id: i64, update: UpdateUser) -> Result<()>;

    /// Delete a user
    async fn delete_user(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self), name = "db_list_users")]
    async fn list_users(&self, page: i64, limit: i64, search: &str) -> Result<Vec<UserInfo>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, email, email_confirmed, password_hash, role_id, created_at, updated_at
            FROM users
            WHERE login ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(page_offset(page, limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list users"))?;

        Ok(rows.into_iter().map(|row| UserInfo::from(User::from(row))).collect())
    }

    #[instrument(skip(self), fields(user_id = id), name = "db_get_user")]
    async fn get_user(&self, id: i64) -> Result<Option<UserInfo>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, email, email_confirmed, password_hash, role_id, created_at, updated_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user"))?;

        Ok(row.map(|r| UserInfo::from(User::from(r))))
    }

    #[instrument(skip(self, email), name = "db_get_user_by_email")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, email, email_confirmed, password_hash, role_id, created_at, updated_at
            FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user by email"))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, user), fields(login = %user.login), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<()> {
        sqlx::query("INSERT INTO users (login, email, password_hash) VALUES ($1, $2, $3)")
            .bind(&user.login)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|err| map_constraint_error(err, "Failed to create user"))?;

        Ok(())
    }

    #[instrument(skip(self, update), fields(user_id = id), name = "db_update_user")]
    async fn update_user(&self, id: i64, update: UpdateUser) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET login = $1, email = $2, updated_at = now() WHERE id = $3",
        )
        .bind(&update.login)
        .bind(&update.email)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_constraint_error(err, "Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("user", id));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = id), name = "db_delete_user")]
    async fn delete_user(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete user"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("user", id));
        }

        Ok(())
    }
}
