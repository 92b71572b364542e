//! # Configuration Management
//!
//! Typed configuration for the ledgerd API, loaded from environment
//! variables (with `.env` support) and validated at startup.

pub mod settings;

pub use settings::{AppConfig, AuthConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};
