//! Liveness endpoint with a database connectivity probe.

use axum::extract::State;
use serde::Serialize;

use crate::api::routes::ApiState;
use crate::api::Json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
pub async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    let database = match &state.pool {
        Some(pool) => match crate::storage::check_connection(pool).await {
            Ok(()) => "ok",
            Err(err) => {
                tracing::warn!(error = %err, "database connectivity probe failed");
                "unavailable"
            }
        },
        None => "ok",
    };

    Json(HealthResponse { status: "ok", database })
}
