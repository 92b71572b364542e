//! Data models used by the authentication and authorization stack.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::errors::Error as CrateError;

/// Role ID granting elevated, cross-user access.
pub const ADMIN_ROLE_ID: i64 = 1;

/// Role ID assigned to newly registered users (matches the schema default).
pub const DEFAULT_ROLE_ID: i64 = 2;

/// Name of the HTTP-only cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Request-scoped identity attached by the authentication middleware and
/// consumed by handlers for ownership and role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub role_id: i64,
}

impl AuthContext {
    pub fn new(user_id: i64, role_id: i64) -> Self {
        Self { user_id, role_id }
    }

    pub fn is_admin(&self) -> bool {
        self.role_id == ADMIN_ROLE_ID
    }
}

/// Errors returned by token verification and the authentication middleware.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: bearer token missing")]
    MissingBearer,
    #[error("unauthorized: malformed bearer token")]
    MalformedBearer,
    #[error("unauthorized: token signature invalid")]
    InvalidSignature,
    #[error("unauthorized: token has expired")]
    ExpiredToken,
    #[error("unauthorized: token malformed")]
    MalformedToken,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("forbidden: administrator role required")]
    Forbidden,
    #[error(transparent)]
    Persistence(#[from] CrateError),
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Registration request body. Bounds follow the user schema.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 2, max = 255, message = "login must be 2 to 255 characters"))]
    pub login: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 4, max = 20, message = "password must be 4 to 20 characters"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub login: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "userRoleID")]
    pub user_role_id: i64,
}
