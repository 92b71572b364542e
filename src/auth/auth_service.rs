//! Authentication service: login, registration, logout, and refresh.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::hashing::PasswordHasher;
use crate::auth::jwt::{TokenCodec, TokenPair};
use crate::auth::models::{
    AuthContext, AuthError, LoginRequest, LoginResponse, RegistrationRequest,
};
use crate::auth::user::NewUser;
use crate::errors::{AuthErrorType, Error, Result};
use crate::storage::repositories::{
    SessionRepository, SqlxSessionRepository, SqlxUserRepository, UserRepository,
};
use crate::storage::DbPool;

/// Extract the token from a two-part `Bearer <token>` authorization header.
pub fn extract_bearer(header: &str) -> std::result::Result<&str, AuthError> {
    if header.trim().is_empty() {
        return Err(AuthError::MissingBearer);
    }

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedBearer),
    }
}

/// Orchestrates credential verification, token issuance, and the session
/// store. Holds no mutable state; everything cross-request lives behind the
/// repository traits.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self { users, sessions, codec, hasher }
    }

    pub fn with_sqlx(pool: DbPool, codec: Arc<TokenCodec>, hasher: Arc<PasswordHasher>) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxSessionRepository::new(pool)),
            codec,
            hasher,
        )
    }

    /// Authenticate a bearer header into a request context. Pure
    /// computation: signature check plus expiry comparison, no store access.
    pub fn authenticate(&self, header: &str) -> std::result::Result<AuthContext, AuthError> {
        let token = extract_bearer(header)?;
        let claims = self.codec.verify(token)?;
        Ok(AuthContext::new(claims.user_id, claims.user_role_id))
    }

    /// Verify credentials, issue a token pair, and store the refresh token
    /// in the user's single session slot (creating or overwriting it).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let user = self
            .users
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| Error::not_found("user", &request.email))?;

        if !self.hasher.verify(&request.password, &user.password_hash) {
            warn!(user_id = user.id, "login attempt with incorrect password");
            return Err(Error::auth("login credential wrong", AuthErrorType::InvalidCredentials));
        }

        let pair = self.codec.issue(user.id, user.role_id).map_err(signing_error)?;

        if self.sessions.exists(user.id).await? {
            self.sessions.rotate(user.id, &pair.refresh_token).await?;
        } else {
            self.sessions.create(user.id, &pair.refresh_token).await?;
        }

        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            login: user.login,
            user_id: user.id,
            user_role_id: user.role_id,
        })
    }

    /// Create a new user with the default role. A duplicate login or email
    /// surfaces as a domain conflict, classified by constraint name in the
    /// repository layer.
    #[instrument(skip(self, request), fields(login = %request.login, email = %request.email))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        let password_hash = self.hasher.hash(&request.password)?;

        self.users
            .create_user(NewUser {
                login: request.login.clone(),
                email: request.email.clone(),
                password_hash,
            })
            .await?;

        info!("user registered");
        Ok(())
    }

    /// Drop the session record for a user. `NotFound` when no session
    /// exists, which the API layer renders as 404.
    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn logout(&self, user_id: i64) -> Result<()> {
        self.sessions.delete(user_id).await?;
        info!(user_id = user_id, "user logged out");
        Ok(())
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// The presented token must verify (signature + expiry) and must match
    /// the value recorded in the session store; a logged-out or
    /// rotated-away token is rejected even when its signature is still
    /// valid.
    #[instrument(skip(self, presented))]
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair> {
        let claims = self.codec.verify(presented).map_err(|err| match err {
            AuthError::Persistence(inner) => inner,
            // The refresh endpoint's contract is 400 for an unusable token.
            other => Error::validation(other.to_string()),
        })?;

        match self.sessions.get(claims.user_id).await? {
            Some(record) if record.token == presented => {}
            _ => {
                warn!(user_id = claims.user_id, "refresh token does not match stored session");
                return Err(Error::auth(
                    "refresh token no longer valid",
                    AuthErrorType::InvalidCredentials,
                ));
            }
        }

        let pair = self.codec.issue(claims.user_id, claims.user_role_id).map_err(signing_error)?;
        self.sessions.rotate(claims.user_id, &pair.refresh_token).await?;

        info!(user_id = claims.user_id, "token pair refreshed");
        Ok(pair)
    }
}

fn signing_error(err: AuthError) -> Error {
    Error::internal(format!("failed to issue tokens: {}", err))
}
