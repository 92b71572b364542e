//! Category repository. Every query filters by the owning user, so a
//! foreign category is indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

use super::{map_constraint_error, page_offset};

/// A user-owned spending/income category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New category database payload.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

/// Update payload for an existing category.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self, user_id: i64, page: i64, limit: i64, search: &str)
        -> Result<Vec<Category>>;

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Category>>;

    async fn create(&self, user_id: i64, category: NewCategory) -> Result<()>;

    /// Update a category; `NotFound` when the row doesn't exist or belongs
    /// to another user
    async fn update(&self, id: i64, user_id: i64, update: UpdateCategory) -> Result<()>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxCategoryRepository {
    pool: DbPool,
}

impl SqlxCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    #[instrument(skip(self), fields(user_id = user_id), name = "db_list_categories")]
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM categories
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
        .map_err(|err| Error::database(err, "Failed to list categories"))?;

        Ok(rows)
    }

    #[instrument(skip(self), fields(category_id = id, user_id = user_id), name = "db_get_category")]
    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM categories WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch category"))?;

        Ok(row)
    }

    #[instrument(skip(self, category), fields(user_id = user_id), name = "db_create_category")]
    async fn create(&self, user_id: i64, category: NewCategory) -> Result<()> {
        sqlx::query("INSERT INTO categories (user_id, name, description) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&self.pool)
            .await
            .map_err(|err| map_constraint_error(err, "Failed to create category"))?;

        Ok(())
    }

    #[instrument(
        skip(self, update),
        fields(category_id = id, user_id = user_id),
        name = "db_update_category"
    )]
    async fn update(&self, id: i64, user_id: i64, update: UpdateCategory) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories SET name = $1, description = $2, updated_at = now()
            WHERE id = $3 AND user_id = $4
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_constraint_error(err, "Failed to update category"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("category", id));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(category_id = id, user_id = user_id), name = "db_delete_category")]
    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete category"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("category", id));
        }

        Ok(())
    }
}
