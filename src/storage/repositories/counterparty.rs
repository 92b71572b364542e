//! Counterparty repository, owner-scoped like categories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

use super::{map_constraint_error, page_offset};

/// A user-owned counterparty (shop, employer, person).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New counterparty database payload.
#[derive(Debug, Clone)]
pub struct NewCounterparty {
    pub name: String,
    pub description: String,
}

/// Update payload for an existing counterparty.
#[derive(Debug, Clone)]
pub struct UpdateCounterparty {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait CounterpartyRepository: Send + Sync {
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Counterparty>>;

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Counterparty>>;

    async fn create(&self, user_id: i64, counterparty: NewCounterparty) -> Result<()>;

    async fn update(&self, id: i64, user_id: i64, update: UpdateCounterparty) -> Result<()>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxCounterpartyRepository {
    pool: DbPool,
}

impl SqlxCounterpartyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterpartyRepository for SqlxCounterpartyRepository {
    #[instrument(skip(self), fields(user_id = user_id), name = "db_list_counterparties")]
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Counterparty>> {
        let rows = sqlx::query_as::<_, Counterparty>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM counterparties
            WHERE user_id = $1
              AND (name ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(search)
        .bind(limit)
        .bind(page_offset(page, limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list counterparties"))?;

        Ok(rows)
    }

    #[instrument(
        skip(self),
        fields(counterparty_id = id, user_id = user_id),
        name = "db_get_counterparty"
    )]
    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Counterparty>> {
        let row = sqlx::query_as::<_, Counterparty>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM counterparties WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch counterparty"))?;

        Ok(row)
    }

    #[instrument(skip(self, counterparty), fields(user_id = user_id), name = "db_create_counterparty")]
    async fn create(&self, user_id: i64, counterparty: NewCounterparty) -> Result<()> {
        sqlx::query("INSERT INTO counterparties (user_id, name, description) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&counterparty.name)
            .bind(&counterparty.description)
            .execute(&self.pool)
            .await
            .map_err(|err| map_constraint_error(err, "Failed to create counterparty"))?;

        Ok(())
    }

    #[instrument(
        skip(self, update),
        fields(counterparty_id = id, user_id = user_id),
        name = "db_update_counterparty"
    )]
    async fn update(&self, id: i64, user_id: i64, update: UpdateCounterparty) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE counterparties SET name = $1, description = $2, updated_at = now()
            WHERE id = $3 AND user_id = $4
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_constraint_error(err, "Failed to update counterparty"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("counterparty", id));
        }

        Ok(())
    }

    #[instrument(
        skip(self),
        fields(counterparty_id = id, user_id = user_id),
        name = "db_delete_counterparty"
    )]
    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM counterparties WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete counterparty"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("counterparty", id));
        }

        Ok(())
    }
}
