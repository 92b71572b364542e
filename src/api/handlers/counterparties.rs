//! Counterparty endpoints, owner-scoped through the request context.

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
use crate::storage::repositories::{Counterparty, NewCounterparty, UpdateCounterparty};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CounterpartyBody {
    #[validate(length(min = 2, max = 255, message = "name must be 2 to 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024, message = "description must be at most 1024 characters"))]
    pub description: String,
}

/// GET /api/v1/counterparties
pub async fn list_counterparties_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Counterparty>>, ApiError> {
    query.validate()?;

    let counterparties = state
        .counterparties
        .list(context.user_id, query.page, query.limit, &query.search)
        .await?;

    Ok(Json(counterparties))
}

/// GET /api/v1/counterparties/{counterpartyID}
pub async fn get_counterparty_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(counterparty_id): Path<i64>,
) -> Result<Json<Counterparty>, ApiError> {
    let counterparty_id = positive_id(counterparty_id)?;

    let counterparty =
        state.counterparties.get(counterparty_id, context.user_id).await?.ok_or_else(|| {
            ApiError::not_found(format!("counterparty {} not found", counterparty_id))
        })?;

    Ok(Json(counterparty))
}

/// POST /api/v1/counterparties
pub async fn create_counterparty_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<CounterpartyBody>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .counterparties
        .create(
            context.user_id,
            NewCounterparty { name: payload.name, description: payload.description },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

/// PUT /api/v1/counterparties/{counterpartyID}
pub async fn edit_counterparty_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(counterparty_id): Path<i64>,
    Json(payload): Json<CounterpartyBody>,
) -> Result<StatusCode, ApiError> {
    let counterparty_id = positive_id(counterparty_id)?;
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .counterparties
        .update(
            counterparty_id,
            context.user_id,
            UpdateCounterparty { name: payload.name, description: payload.description },
        )
        .await?;

    Ok(StatusCode::OK)
}

/// DELETE /api/v1/counterparties/{counterpartyID}
pub async fn delete_counterparty_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(counterparty_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let counterparty_id = positive_id(counterparty_id)?;

    state.counterparties.delete(counterparty_id, context.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
