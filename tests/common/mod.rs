//! Shared test harness: in-memory fakes implementing the repository traits
//! and helpers for driving the router without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use tower::util::ServiceExt;

use ledgerd::api::{build_router, ApiState};
use ledgerd::auth::hashing::PasswordHasher;
use ledgerd::auth::jwt::TokenCodec;
use ledgerd::auth::models::{ADMIN_ROLE_ID, DEFAULT_ROLE_ID};
use ledgerd::auth::user::{NewUser, UpdateUser, User, UserInfo};
use ledgerd::auth::AuthService;
use ledgerd::errors::{Error, Result};
use ledgerd::storage::repositories::{
    Category, CategoryRepository, Counterparty, CounterpartyRepository, NewCategory,
    NewCounterparty, NewTransaction, SessionRecord, SessionRepository, Transaction,
    TransactionRepository, UpdateCategory, UpdateCounterparty, UpdateTransaction, UserRepository,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-32-bytes-long!!";

fn matches_search(haystacks: &[&str], search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

fn page_slice<T: Clone>(items: Vec<T>, page: i64, limit: i64) -> Vec<T> {
    let offset = ((page - 1) * limit) as usize;
    items.into_iter().skip(offset).take(limit as usize).collect()
}

// ---------------------------------------------------------------------------
// Fakes

#[derive(Default)]
pub struct FakeUserRepository {
    pub users: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
}

impl FakeUserRepository {
    pub fn new() -> Self {
        Self { users: Mutex::new(Vec::new()), next_id: Mutex::new(1) }
    }

    /// Seed a user with an explicit role, returning its ID.
    pub fn insert(&self, login: &str, email: &str, password_hash: String, role_id: i64) -> i64 {
        let mut users = self.users.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        users.push(User {
            id,
            login: login.to_string(),
            email: email.to_string(),
            email_confirmed: false,
            password_hash,
            role_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        *next_id += 1;
        id
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn list_users(&self, page: i64, limit: i64, search: &str) -> Result<Vec<UserInfo>> {
        let users = self.users.lock().unwrap();
        let matching: Vec<UserInfo> = users
            .iter()
            .filter(|u| matches_search(&[&u.login, &u.email], search))
            .cloned()
            .map(UserInfo::from)
            .collect();
        Ok(page_slice(matching, page, limit))
    }

    async fn get_user(&self, id: i64) -> Result<Option<UserInfo>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned().map(UserInfo::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<()> {
        {
            let users = self.users.lock().unwrap();
            if users.iter().any(|u| u.login == user.login) {
                return Err(Error::conflict("user login already taken", "user"));
            }
            if users.iter().any(|u| u.email == user.email) {
                return Err(Error::conflict("user email already taken", "user"));
            }
        }
        self.insert(&user.login, &user.email, user.password_hash, DEFAULT_ROLE_ID);
        Ok(())
    }

    async fn update_user(&self, id: i64, update: UpdateUser) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.login = update.login;
                user.email = update.email;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::not_found("user", id)),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(Error::not_found("user", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSessionRepository {
    pub records: Mutex<HashMap<i64, SessionRecord>>,
}

impl FakeSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_token(&self, user_id: i64) -> Option<String> {
        self.records.lock().unwrap().get(&user_id).map(|r| r.token.clone())
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for FakeSessionRepository {
    async fn get(&self, user_id: i64) -> Result<Option<SessionRecord>> {
        Ok(self.records.lock().unwrap().get(&user_id).cloned())
    }

    async fn exists(&self, user_id: i64) -> Result<bool> {
        Ok(self.records.lock().unwrap().contains_key(&user_id))
    }

    async fn create(&self, user_id: i64, token: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&user_id) {
            return Err(Error::internal("session slot already occupied"));
        }
        records.insert(
            user_id,
            SessionRecord { user_id, token: token.to_string(), created_at: Utc::now() },
        );
        Ok(())
    }

    async fn rotate(&self, user_id: i64, token: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&user_id) {
            Some(record) => {
                record.token = token.to_string();
                Ok(())
            }
            None => Err(Error::not_found("session", user_id)),
        }
    }

    async fn delete(&self, user_id: i64) -> Result<()> {
        match self.records.lock().unwrap().remove(&user_id) {
            Some(_) => Ok(()),
            None => Err(Error::not_found("session", user_id)),
        }
    }
}

#[derive(Default)]
pub struct FakeCategoryRepository {
    pub categories: Mutex<Vec<Category>>,
    next_id: Mutex<i64>,
}

impl FakeCategoryRepository {
    pub fn new() -> Self {
        Self { categories: Mutex::new(Vec::new()), next_id: Mutex::new(1) }
    }

    pub fn insert(&self, user_id: i64, name: &str, description: &str) -> i64 {
        let mut categories = self.categories.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        categories.push(Category {
            id,
            user_id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        *next_id += 1;
        id
    }
}

#[async_trait]
impl CategoryRepository for FakeCategoryRepository {
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        let matching: Vec<Category> = categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| matches_search(&[&c.name, &c.description], search))
            .cloned()
            .collect();
        Ok(page_slice(matching, page, limit))
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, category: NewCategory) -> Result<()> {
        {
            let categories = self.categories.lock().unwrap();
            if categories.iter().any(|c| c.user_id == user_id && c.name == category.name) {
                return Err(Error::conflict("category name already taken", "category"));
            }
        }
        self.insert(user_id, &category.name, &category.description);
        Ok(())
    }

    async fn update(&self, id: i64, user_id: i64, update: UpdateCategory) -> Result<()> {
        let mut categories = self.categories.lock().unwrap();
        match categories.iter_mut().find(|c| c.id == id && c.user_id == user_id) {
            Some(category) => {
                category.name = update.name;
                category.description = update.description;
                category.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::not_found("category", id)),
        }
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.id == id && c.user_id == user_id));
        if categories.len() == before {
            return Err(Error::not_found("category", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCounterpartyRepository {
    pub counterparties: Mutex<Vec<Counterparty>>,
    next_id: Mutex<i64>,
}

impl FakeCounterpartyRepository {
    pub fn new() -> Self {
        Self { counterparties: Mutex::new(Vec::new()), next_id: Mutex::new(1) }
    }
}

#[async_trait]
impl CounterpartyRepository for FakeCounterpartyRepository {
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Counterparty>> {
        let counterparties = self.counterparties.lock().unwrap();
        let matching: Vec<Counterparty> = counterparties
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| matches_search(&[&c.name, &c.description], search))
            .cloned()
            .collect();
        Ok(page_slice(matching, page, limit))
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Counterparty>> {
        Ok(self
            .counterparties
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, counterparty: NewCounterparty) -> Result<()> {
        let mut counterparties = self.counterparties.lock().unwrap();
        if counterparties.iter().any(|c| c.user_id == user_id && c.name == counterparty.name) {
            return Err(Error::conflict("counterparty name already taken", "counterparty"));
        }
        let mut next_id = self.next_id.lock().unwrap();
        counterparties.push(Counterparty {
            id: *next_id,
            user_id,
            name: counterparty.name,
            description: counterparty.description,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        *next_id += 1;
        Ok(())
    }

    async fn update(&self, id: i64, user_id: i64, update: UpdateCounterparty) -> Result<()> {
        let mut counterparties = self.counterparties.lock().unwrap();
        match counterparties.iter_mut().find(|c| c.id == id && c.user_id == user_id) {
            Some(counterparty) => {
                counterparty.name = update.name;
                counterparty.description = update.description;
                counterparty.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::not_found("counterparty", id)),
        }
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let mut counterparties = self.counterparties.lock().unwrap();
        let before = counterparties.len();
        counterparties.retain(|c| !(c.id == id && c.user_id == user_id));
        if counterparties.len() == before {
            return Err(Error::not_found("counterparty", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTransactionRepository {
    pub transactions: Mutex<Vec<Transaction>>,
    next_id: Mutex<i64>,
}

impl FakeTransactionRepository {
    pub fn new() -> Self {
        Self { transactions: Mutex::new(Vec::new()), next_id: Mutex::new(1) }
    }
}

#[async_trait]
impl TransactionRepository for FakeTransactionRepository {
    async fn list(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.lock().unwrap();
        let matching: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| matches_search(&[&t.comment, &t.currency], search))
            .cloned()
            .collect();
        Ok(page_slice(matching, page, limit))
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: i64, transaction: NewTransaction) -> Result<()> {
        let mut transactions = self.transactions.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        transactions.push(Transaction {
            id: *next_id,
            user_id,
            category_id: transaction.category_id,
            counterparty_id: transaction.counterparty_id,
            kind: transaction.kind,
            date: transaction.date,
            amount: transaction.amount,
            currency: transaction.currency,
            comment: transaction.comment,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        *next_id += 1;
        Ok(())
    }

    async fn update(&self, id: i64, user_id: i64, update: UpdateTransaction) -> Result<()> {
        let mut transactions = self.transactions.lock().unwrap();
        match transactions.iter_mut().find(|t| t.id == id && t.user_id == user_id) {
            Some(transaction) => {
                transaction.category_id = update.category_id;
                transaction.counterparty_id = update.counterparty_id;
                transaction.kind = update.kind;
                transaction.date = update.date;
                transaction.amount = update.amount;
                transaction.currency = update.currency;
                transaction.comment = update.comment;
                transaction.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::not_found("transaction", id)),
        }
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let mut transactions = self.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|t| !(t.id == id && t.user_id == user_id));
        if transactions.len() == before {
            return Err(Error::not_found("transaction", id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness

pub struct Harness {
    pub router: Router,
    pub users: Arc<FakeUserRepository>,
    pub sessions: Arc<FakeSessionRepository>,
    pub categories: Arc<FakeCategoryRepository>,
    pub hasher: PasswordHasher,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(FakeUserRepository::new());
        let sessions = Arc::new(FakeSessionRepository::new());
        let categories = Arc::new(FakeCategoryRepository::new());
        let counterparties = Arc::new(FakeCounterpartyRepository::new());
        let transactions = Arc::new(FakeTransactionRepository::new());

        let codec = Arc::new(TokenCodec::new(TEST_SECRET, 2, 24));
        let hasher = Arc::new(PasswordHasher::new(4)); // bcrypt minimum cost
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            sessions.clone(),
            codec,
            hasher.clone(),
        ));

        let state = ApiState {
            auth_service,
            users: users.clone(),
            categories: categories.clone(),
            counterparties,
            transactions,
            pool: None,
            refresh_cookie_max_age: time::Duration::hours(24),
        };

        Self {
            router: build_router(state),
            users,
            sessions,
            categories,
            hasher: PasswordHasher::new(4), // bcrypt minimum cost
        }
    }

    /// Seed a user directly into the fake directory, bypassing the API.
    pub fn seed_user(&self, login: &str, email: &str, password: &str, role_id: i64) -> i64 {
        let hash = self.hasher.hash(password).expect("hash seed password");
        self.users.insert(login, email, hash, role_id)
    }

    pub fn seed_admin(&self, login: &str, email: &str, password: &str) -> i64 {
        self.seed_user(login, email, password, ADMIN_ROLE_ID)
    }
}

// ---------------------------------------------------------------------------
// Request helpers

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.expect("router must respond");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Like [`send`], but also returns the raw response headers (for cookies).
pub async fn send_raw(
    router: &Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = router.clone().oneshot(request).await.expect("router must respond");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, headers, json)
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("build request")
}

/// Log in through the API and return the full response body.
pub async fn login(router: &Router, email: &str, password: &str) -> serde_json::Value {
    let (status, body) = send(
        router,
        post_json("/api/v1/login", serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login should succeed: {:?}", body);
    body
}
