//! Category endpoints, owner-scoped through the request context.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::params::{positive_id, ListQuery};
use crate::api::routes::ApiState;
use crate::api::{Json, Query};
use crate::auth::models::AuthContext;
use crate::errors::Error;
use crate::storage::repositories::{Category, NewCategory, UpdateCategory};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryBody {
    #[validate(length(min = 2, max = 255, message = "name must be 2 to 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024, message = "description must be at most 1024 characters"))]
    pub description: String,
}

/// GET /api/v1/categories
pub async fn list_categories_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    query.validate()?;

    let categories = state
        .categories
        .list(context.user_id, query.page, query.limit, &query.search)
        .await?;

    Ok(Json(categories))
}

/// GET /api/v1/categories/{categoryID}
pub async fn get_category_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(category_id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category_id = positive_id(category_id)?;

    let category = state
        .categories
        .get(category_id, context.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("category {} not found", category_id)))?;

    Ok(Json(category))
}

/// POST /api/v1/categories
pub async fn create_category_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<CategoryBody>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .categories
        .create(
            context.user_id,
            NewCategory { name: payload.name, description: payload.description },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

/// PUT /api/v1/categories/{categoryID}
pub async fn edit_category_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryBody>,
) -> Result<StatusCode, ApiError> {
    let category_id = positive_id(category_id)?;
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .categories
        .update(
            category_id,
            context.user_id,
            UpdateCategory { name: payload.name, description: payload.description },
        )
        .await?;

    Ok(StatusCode::OK)
}

/// DELETE /api/v1/categories/{categoryID}
pub async fn delete_category_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let category_id = positive_id(category_id)?;

    state.categories.delete(category_id, context.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
