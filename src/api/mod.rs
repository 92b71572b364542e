//! # HTTP API Layer
//!
//! Axum router, handlers, and the request/response contract helpers.

pub mod error;
pub mod handlers;
pub mod params;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};

use axum::response::IntoResponse;
use serde::Serialize;

use crate::api::error::ApiError;

/// JSON body extractor whose rejection keeps the `{code, message}` error
/// envelope instead of axum's plain-text default. Doubles as the JSON
/// response type.
#[derive(Debug, Clone, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// Query extractor with the same enveloped rejection behavior.
#[derive(Debug, Clone, axum::extract::FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);
