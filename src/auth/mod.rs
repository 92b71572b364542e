//! Authentication and authorization for the ledgerd API.
//!
//! Covers password hashing, signed token pairs, the login/registration/
//! logout/refresh service, and the middleware gating protected routes.

pub mod auth_service;
pub mod hashing;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user;

pub use auth_service::{extract_bearer, AuthService};
pub use hashing::PasswordHasher;
pub use jwt::{TokenCodec, TokenPair};
pub use models::{
    AuthContext, AuthError, LoginRequest, LoginResponse, RegistrationRequest, ADMIN_ROLE_ID,
    DEFAULT_ROLE_ID, REFRESH_COOKIE,
};
pub use user::{NewUser, UpdateUser, User, UserInfo};
