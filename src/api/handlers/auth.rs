//! Authentication endpoints: login, registration, logout, refresh.

use axum::{extract::State, http::StatusCode, Extension};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::api::Json;
use crate::auth::jwt::TokenPair;
use crate::auth::models::{
    AuthContext, LoginRequest, LoginResponse, RegistrationRequest, REFRESH_COOKIE,
};
use crate::errors::Error;

fn refresh_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE).path("/").build()
}

/// POST /api/v1/login
pub async fn login_handler(
    State(state): State<ApiState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    let response = state.auth_service.login(&payload).await?;

    let jar = jar.add(refresh_cookie(response.refresh_token.clone(), state.refresh_cookie_max_age));
    Ok((jar, Json(response)))
}

/// POST /api/v1/registration
pub async fn registration_handler(
    State(state): State<ApiState>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<StatusCode, ApiError> {
    payload.validate().map_err(|err| ApiError::from(Error::from(err)))?;

    state.auth_service.register(&payload).await?;
    Ok(StatusCode::CREATED)
}

/// POST /api/v1/logout
///
/// Runs behind the authentication middleware, so the bearer token has
/// already been verified; all that remains is dropping the session slot and
/// expiring the cookie.
pub async fn logout_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), ApiError> {
    state.auth_service.logout(context.user_id).await?;

    let jar = jar.remove(removal_cookie());
    Ok((StatusCode::NO_CONTENT, jar))
}

/// POST /api/v1/refresh
///
/// Cookie-driven: the refresh token travels in the HTTP-only cookie, not
/// the Authorization header.
pub async fn refresh_handler(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenPair>), ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::bad_request("refresh token in cookie not found"))?;

    let pair = state.auth_service.refresh(&presented).await?;

    let jar = jar.add(refresh_cookie(pair.refresh_token.clone(), state.refresh_cookie_max_age));
    Ok((jar, Json(pair)))
}
