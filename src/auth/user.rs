//! User identity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user record, including the password hash. Never serialized to
/// clients; handlers expose [`UserInfo`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub email_confirmed: bool,
    pub password_hash: String,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub email_confirmed: bool,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            email: user.email,
            email_confirmed: user.email_confirmed,
            role_id: user.role_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// New user database payload. The password arrives here already hashed;
/// the role comes from the schema default unless the caller is an admin
/// creating a user explicitly.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub email: String,
    pub password_hash: String,
}

/// Update payload for profile edits.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub login: String,
    pub email: String,
}
