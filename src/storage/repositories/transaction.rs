//! Transaction repository: income/expense records referencing a category
//! and a counterparty, owner-scoped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

use super::page_offset;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    In,
    Out,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "in" => Ok(TransactionKind::In),
            "out" => Ok(TransactionKind::Out),
            other => Err(Error::validation(format!(
                "transaction kind must be \"in\" or \"out\", got \"{}\"",
                other
            ))),
        }
    }
}

/// An income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub counterparty_id: i64,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct TransactionRow {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub counterparty_id: i64,
    pub kind: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = Error;

    fn try_from(row: TransactionRow) -> Result<Self> {
        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            counterparty_id: row.counterparty_id,
            kind: TransactionKind::from_str(&row.kind)?,
            date: row.date,
            amount: row.amount,
            currency: row.currency,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// New transaction database payload.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub category_id: i64,
    pub counterparty_id: i64,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub comment: String,
}

/// Update payload for an existing transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransaction {
    pub category_id: i64,
    pub counterparty_id: i64,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub comment: String,
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// List transactions with pagination and a case-insensitive substring
    /// search over comment and currency.
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Transaction>>;

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Transaction>>;

    async fn create(&self, user_id: i64, transaction: NewTransaction) -> Result<()>;

    async fn update(&self, id: i64, user_id: i64, update: UpdateTransaction) -> Result<()>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxTransactionRepository {
    pool: DbPool,
}

impl SqlxTransactionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for SqlxTransactionRepository {
    #[instrument(skip(self), fields(user_id = user_id), name = "db_list_transactions")]
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, category_id, counterparty_id, kind, date, amount,
                   currency, comment, created_at, updated_at
            FROM transactions
            WHERE user_id = $1
              AND (comment ILIKE '%' || $2 || '%' OR currency ILIKE '%' || $2 || '%')
            ORDER BY date DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(search)
        .bind(limit)
        .bind(page_offset(page, limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list transactions"))?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    #[instrument(
        skip(self),
        fields(transaction_id = id, user_id = user_id),
        name = "db_get_transaction"
    )]
    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, category_id, counterparty_id, kind, date, amount,
                   currency, comment, created_at, updated_at
            FROM transactions WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch transaction"))?;

        row.map(Transaction::try_from).transpose()
    }

    #[instrument(skip(self, transaction), fields(user_id = user_id), name = "db_create_transaction")]
    async fn create(&self, user_id: i64, transaction: NewTransaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (user_id, category_id, counterparty_id, kind, date, amount, currency, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user_id)
        .bind(transaction.category_id)
        .bind(transaction.counterparty_id)
        .bind(transaction.kind.as_str())
        .bind(transaction.date)
        .bind(transaction.amount)
        .bind(&transaction.currency)
        .bind(&transaction.comment)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to create transaction"))?;

        Ok(())
    }

    #[instrument(
        skip(self, update),
        fields(transaction_id = id, user_id = user_id),
        name = "db_update_transaction"
    )]
    async fn update(&self, id: i64, user_id: i64, update: UpdateTransaction) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET category_id = $1, counterparty_id = $2, kind = $3, date = $4,
                amount = $5, currency = $6, comment = $7, updated_at = now()
            WHERE id = $8 AND user_id = $9
            "#,
        )
        .bind(update.category_id)
        .bind(update.counterparty_id)
        .bind(update.kind.as_str())
        .bind(update.date)
        .bind(update.amount)
        .bind(&update.currency)
        .bind(&update.comment)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to update transaction"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("transaction", id));
        }

        Ok(())
    }

    #[instrument(
        skip(self),
        fields(transaction_id = id, user_id = user_id),
        name = "db_delete_transaction"
    )]
    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete transaction"))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("transaction", id));
        }

        Ok(())
    }
}
