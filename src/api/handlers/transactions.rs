//! Transaction endpoints, owner-scoped through the request context.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::params::{positive_id, ListQuery};
use crate::api::routes::ApiState;
use crate::api::{Json, Query};
use crate::auth::models::AuthContext;
use crate::errors::Error;
use crate::storage::repositories::{
    NewTransaction, Transaction, TransactionKind, UpdateTransaction,
};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    #[serde(rename = "categoryID")]
    #[validate(range(min = 1, message = "categoryID must be a positive integer"))]
    pub category_id: i64,
    #[serde(rename = "counterpartyID")]
    #[validate(range(min = 1, message = "counterpartyID must be a positive integer"))]
    pub counterparty_id: i64,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than zero"))]
    pub amount: f64,
    #[validate(length(min = 1, max = 8, message = "currency must be 1 to 8 characters"))]
    pub currency: String,
    #[serde(default)]
    #[validate(length(max = 2048, message = "comment must be at most 2048 characters"))]
    pub comment: String,
}

impl TransactionBody {
    fn into_new(self) -> NewTransaction {
        NewTransaction {
            category_id: self.category_id,
            counterparty_id: self.counterparty_id,
            kind: self.kind,
            date: self.date,
            amount: self.amount,
            currency: self.currency,
            comment: self.comment,
        }
    }

    fn into_update(self) -> UpdateTransaction {
        UpdateTransaction {
            category_id: self.category_id,
            counterparty_id: self.counterparty_id,
            kind: self.kind,
            date: self.date,
            amount: self.amount,
            currency: self.currency,
            comment: self.comment,
        }
    }
}

/// GET /api/v1/transactions
pub async fn list_transactions_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    query.validate()?;

    let transactions = state
        .transactions
        .list(context.user_id, query.page, query.limit, &query.search)
        .await?;

    Ok(Json(transactions))
}

/// GET /api/v1/transactions/{transactionID}
pub async fn get_transaction_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(transaction_id): Path<i64>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction_id = positive_id(transaction_id)?;

    let transaction =
        state.transactions.get(transaction_id, context.user_id).await?.ok_or_else(|| {
            ApiError::not_found(format!("transaction {} not found", transaction_id))
        })?;

    Ok(Json(transaction))
}

/// POST /api/v1/transactions
pub async fn create_transaction_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Json(payload): Json<TransactionBody>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state.transactions.create(context.user_id, payload.into_new()).await?;
    Ok(StatusCode::CREATED)
}

/// PUT /api/v1/transactions/{transactionID}
pub async fn edit_transaction_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(transaction_id): Path<i64>,
    Json(payload): Json<TransactionBody>,
) -> Result<StatusCode, ApiError> {
    let transaction_id = positive_id(transaction_id)?;
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state
        .transactions
        .update(transaction_id, context.user_id, payload.into_update())
        .await?;

    Ok(StatusCode::OK)
}

/// DELETE /api/v1/transactions/{transactionID}
pub async fn delete_transaction_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    Path(transaction_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let transaction_id = positive_id(transaction_id)?;

    state.transactions.delete(transaction_id, context.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
