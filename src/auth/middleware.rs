//! Axum middleware for authentication and authorization.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::warn;

use crate::api::error::ApiError;
use crate::auth::auth_service::AuthService;
use crate::auth::models::AuthContext;

pub type AuthServiceState = Arc<AuthService>;

/// Authenticate the request's bearer token and attach an [`AuthContext`] to
/// the request extensions for downstream handlers.
pub async fn authenticate(
    State(auth_service): State<AuthServiceState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");

    match auth_service.authenticate(header) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                error = %err,
                "authentication failed"
            );
            Err(ApiError::from(err))
        }
    }
}

/// Reject non-administrator callers. Composed after [`authenticate`], which
/// provides the context extension.
pub async fn require_admin(
    Extension(context): Extension<AuthContext>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !context.is_admin() {
        warn!(
            user_id = context.user_id,
            role_id = context.role_id,
            path = %request.uri().path(),
            "admin gate rejected non-admin caller"
        );
        return Err(ApiError::forbidden("forbidden: administrator role required"));
    }

    Ok(next.run(request).await)
}
