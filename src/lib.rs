//! # ledgerd
//!
//! A personal-finance tracking HTTP API. Users authenticate with
//! email/password, then manage categories, counterparties, and transactions
//! scoped to their account.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API (axum) → Auth middleware → Resource handlers
//!       ↓                ↓                  ↓
//!  Contract helpers   Auth service     Repositories (sqlx/PostgreSQL)
//! ```
//!
//! ## Core Components
//!
//! - **Auth stack**: bcrypt password hashing, HS256 token pairs
//!   (short-lived access + longer-lived refresh), a single refresh-token
//!   slot per user, and middleware that turns bearer tokens into a typed
//!   request context.
//! - **Resource services**: owner-scoped CRUD for categories,
//!   counterparties, and transactions, plus user administration.
//! - **Persistence**: SQLx over PostgreSQL with embedded migrations.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod observability;
pub mod storage;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use observability::init_tracing;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
