//! User endpoints. Listing and creation are admin-only; reads are open to
//! any authenticated user; edits and deletes are restricted to the owner
//! or an administrator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::params::{positive_id, ListQuery};
use crate::api::routes::ApiState;
use crate::api::{Json, Query};
use crate::auth::models::{AuthContext, RegistrationRequest};
use crate::auth::user::{UpdateUser, UserInfo};
use crate::errors::Error;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditUserBody {
    #[validate(length(min = 2, max = 255, message = "login must be 2 to 255 characters"))]
    pub login: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

fn ensure_self_or_admin(context: &AuthContext, user_id: i64) -> Result<(), ApiError> {
    if context.user_id != user_id && !context.is_admin() {
        return Err(ApiError::forbidden("forbidden: cannot modify another user"));
    }
    Ok(())
}

/// GET /api/v1/users (admin)
pub async fn list_users_handler(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserInfo>>, ApiError> {
    query.validate()?;

    let users = state.users.list_users(query.page, query.limit, &query.search).await?;
    Ok(Json(users))
}

/// POST /api/v1/users (admin)
///
/// Shares the registration payload and hashing path; the only difference
/// from self-registration is who is allowed to call it.
pub async fn create_user_handler(
    State(state): State<ApiState>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state.auth_service.register(&payload).await?;
    Ok(StatusCode::CREATED)
}

/// GET /api/v1/users/{userID}
pub async fn get_user_handler(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserInfo>, ApiError> {
    let user_id = positive_id(user_id)?;

    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", user_id)))?;

    Ok(Json(user))
}

/// PUT /api/v1/users/{userID}
pub async fn edit_user_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(user_id): Path<i64>,
    Json(payload): Json<EditUserBody>,
) -> Result<StatusCode, ApiError> {
    let user_id = positive_id(user_id)?;
    ensure_self_or_admin(&context, user_id)?;
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .users
        .update_user(user_id, UpdateUser { login: payload.login, email: payload.email })
        .await?;

    Ok(StatusCode::OK)
}

/// DELETE /api/v1/users/{userID}
pub async fn delete_user_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user_id = positive_id(user_id)?;
    ensure_self_or_admin(&context, user_id)?;

    state.users.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
