//! Router assembly and shared API state.

use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::handlers::{auth, categories, counterparties, health, transactions, users};
use crate::auth::auth_service::AuthService;
use crate::auth::middleware::{authenticate, require_admin, AuthServiceState};
use crate::config::AppConfig;
use crate::storage::repositories::{
    CategoryRepository, CounterpartyRepository, SqlxCategoryRepository,
    SqlxCounterpartyRepository, SqlxTransactionRepository, SqlxUserRepository,
    TransactionRepository, UserRepository,
};
use crate::storage::DbPool;

/// Shared state handed to every handler. Repositories sit behind trait
/// objects so tests can swap in in-memory fakes without a database.
#[derive(Clone)]
pub struct ApiState {
    pub auth_service: Arc<AuthService>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub counterparties: Arc<dyn CounterpartyRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub pool: Option<DbPool>,
    pub refresh_cookie_max_age: time::Duration,
}

impl ApiState {
    /// Production wiring over a PostgreSQL pool.
    pub fn with_sqlx(pool: DbPool, config: &AppConfig) -> Self {
        let codec = Arc::new(crate::auth::jwt::TokenCodec::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.access_ttl_hours,
            config.auth.refresh_ttl_hours,
        ));
        let hasher = Arc::new(crate::auth::hashing::PasswordHasher::new(config.auth.password_cost));
        let auth_service = Arc::new(AuthService::with_sqlx(pool.clone(), codec, hasher));

        Self {
            auth_service,
            users: Arc::new(SqlxUserRepository::new(pool.clone())),
            categories: Arc::new(SqlxCategoryRepository::new(pool.clone())),
            counterparties: Arc::new(SqlxCounterpartyRepository::new(pool.clone())),
            transactions: Arc::new(SqlxTransactionRepository::new(pool.clone())),
            pool: Some(pool),
            refresh_cookie_max_age: time::Duration::seconds(
                config.auth.refresh_cookie_max_age().as_secs() as i64,
            ),
        }
    }
}

/// Build the full application router.
pub fn build_router(state: ApiState) -> Router {
    let auth_state: AuthServiceState = state.auth_service.clone();

    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/login", post(auth::login_handler))
        .route("/api/v1/registration", post(auth::registration_handler))
        // Refresh is cookie-driven, not bearer-gated.
        .route("/api/v1/refresh", post(auth::refresh_handler));

    let protected = Router::new()
        .route("/api/v1/logout", post(auth::logout_handler))
        .route(
            "/api/v1/users/{userID}",
            get(users::get_user_handler)
                .put(users::edit_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/api/v1/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            "/api/v1/categories/{categoryID}",
            get(categories::get_category_handler)
                .put(categories::edit_category_handler)
                .delete(categories::delete_category_handler),
        )
        .route(
            "/api/v1/counterparties",
            get(counterparties::list_counterparties_handler)
                .post(counterparties::create_counterparty_handler),
        )
        .route(
            "/api/v1/counterparties/{counterpartyID}",
            get(counterparties::get_counterparty_handler)
                .put(counterparties::edit_counterparty_handler)
                .delete(counterparties::delete_counterparty_handler),
        )
        .route(
            "/api/v1/transactions",
            get(transactions::list_transactions_handler)
                .post(transactions::create_transaction_handler),
        )
        .route(
            "/api/v1/transactions/{transactionID}",
            get(transactions::get_transaction_handler)
                .put(transactions::edit_transaction_handler)
                .delete(transactions::delete_transaction_handler),
        )
        .layer(middleware::from_fn_with_state(auth_state.clone(), authenticate));

    let admin = Router::new()
        .route(
            "/api/v1/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(auth_state, authenticate));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .fallback(|| async { ApiError::not_found("route not found") })
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Convert a recovered handler panic into the standard 500 envelope; the
/// panic payload goes to the log, never to the client.
fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");

    let body = serde_json::to_string(&ErrorBody { code: 500, message: "internal server error".to_string() })
        .unwrap_or_else(|_| r#"{"code":500,"message":"internal server error"}"#.to_string());

    axum::response::Response::builder()
        .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body))
        .unwrap_or_else(|_| {
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
