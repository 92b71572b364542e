//! HTTP handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod counterparties;
pub mod health;
pub mod transactions;
pub mod users;
