//! API error envelope.
//!
//! Every 4xx/5xx response body is `{code, message}` with `code` mirroring
//! the HTTP status. Internal failures are logged with full detail and
//! rendered with a generic message only.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::auth::models::AuthError;
use crate::errors::{AuthErrorType, Error};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden<S: Into<String>>(msg: S) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Log the real cause server-side and hand the client the generic
    /// message; internals never leak through a 500.
    pub fn internal<E: std::fmt::Display>(detail: E) -> Self {
        tracing::error!(error = %detail, "internal server error");
        ApiError::Internal("internal server error".to_string())
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
        };

        (status, axum::Json(ErrorBody { code: status.as_u16(), message })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { message, .. } => ApiError::BadRequest(message),
            Error::Serialization { .. } => ApiError::BadRequest("invalid request body".to_string()),
            Error::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} {} not found", resource_type, id))
            }
            // Uniqueness conflicts render as a 400 with the domain message.
            Error::Conflict { message, .. } => ApiError::BadRequest(message),
            Error::Auth { message, error_type } => match error_type {
                AuthErrorType::InsufficientPermissions => ApiError::Forbidden(message),
                AuthErrorType::InvalidCredentials => ApiError::BadRequest(message),
                _ => ApiError::Unauthorized(message),
            },
            err @ (Error::Config { .. }
            | Error::Database { .. }
            | Error::Io { .. }
            | Error::Internal { .. }) => ApiError::internal(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingBearer
            | AuthError::MalformedBearer
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::MalformedToken => ApiError::Unauthorized(err.to_string()),
            AuthError::Forbidden => ApiError::Forbidden(err.to_string()),
            AuthError::Signing(_) => ApiError::internal(err),
            AuthError::Persistence(inner) => ApiError::from(inner),
        }
    }
}

// Body/query extractor rejections keep the `{code, message}` envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
