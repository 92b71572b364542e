//! Repository layer: one trait + SQLx implementation per aggregate.
//!
//! Production code talks to PostgreSQL through the `Sqlx*` types; tests
//! substitute in-memory fakes implementing the same traits.

mod category;
mod counterparty;
mod session;
mod transaction;
mod user;

pub use category::{Category, CategoryRepository, NewCategory, SqlxCategoryRepository, UpdateCategory};
pub use counterparty::{
    Counterparty, CounterpartyRepository, NewCounterparty, SqlxCounterpartyRepository,
    UpdateCounterparty,
};
pub use session::{SessionRecord, SessionRepository, SqlxSessionRepository};
pub use transaction::{
    NewTransaction, SqlxTransactionRepository, Transaction, TransactionKind,
    TransactionRepository, UpdateTransaction,
};
pub use user::{SqlxUserRepository, UserRepository};

use crate::errors::Error;

/// Compute the SQL offset for a 1-based page. Callers validate `page` and
/// `limit` to be >= 1 before reaching the repository layer.
pub(crate) fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// Translate a backing-store uniqueness violation into the matching domain
/// conflict. Constraints are matched by name, never by error text; anything
/// unrecognized stays a database error.
pub(crate) fn map_constraint_error(err: sqlx::Error, context: &str) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            let known = match constraint {
                "users_unique_login" => Some(("user login already taken", "user")),
                "users_unique_email" => Some(("user email already taken", "user")),
                "categories_user_category_name" => {
                    Some(("category name already taken", "category"))
                }
                "counterparties_user_counterparty_name" => {
                    Some(("counterparty name already taken", "counterparty"))
                }
                _ => None,
            };
            if let Some((message, resource_type)) = known {
                return Error::conflict(message, resource_type);
            }
        }
    }
    Error::database(err, context)
}
