#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use account_service::app::{router, AppState};
use account_service::service::AccountService;
use account_service::store::{Account, NewAccount, StoreError, UserStats, UserStore};
use common_auth::{Claims, Role, TokenCodec};

/// In-memory stand-in for the Postgres store. Keeps the same contract,
/// including the uniqueness guarantee on insert, so lifecycle and router
/// tests run without external services.
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

struct MemoryInner {
    next_id: i64,
    accounts: Vec<Account>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                next_id: 1,
                accounts: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().unwrap().accounts.len() as i64)
    }

    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.iter().any(|account| account.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let account = Account {
            id: inner.next_id,
            email: new.email,
            name: new.name,
            role: new.role,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .iter()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|account| account.id == id).cloned())
    }

    async fn list_newest_first(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut accounts = inner.accounts.clone();
        accounts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(accounts)
    }

    async fn stats(&self) -> Result<UserStats, StoreError> {
        let inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let count_role = |role: Role| {
            inner
                .accounts
                .iter()
                .filter(|account| account.role == role)
                .count() as i64
        };
        let count_since = |days: i64| {
            inner
                .accounts
                .iter()
                .filter(|account| account.created_at > now - Duration::days(days))
                .count() as i64
        };

        Ok(UserStats {
            total_users: inner.accounts.len() as i64,
            creators: count_role(Role::Creator),
            admins: count_role(Role::Admin),
            users: count_role(Role::User),
            users_last_7_days: count_since(7),
            users_last_30_days: count_since(30),
        })
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.accounts.iter_mut().find(|account| account.id == id) {
            Some(account) => {
                account.role = role;
                account.updated_at = Utc::now();
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.accounts.len();
        inner.accounts.retain(|account| account.id != id);
        Ok(inner.accounts.len() < before)
    }
}

pub struct TestContext {
    pub app: Router,
    pub service: Arc<AccountService>,
    pub codec: Arc<TokenCodec>,
}

pub fn test_context() -> TestContext {
    let codec = Arc::new(TokenCodec::new("test-secret"));
    let service = Arc::new(AccountService::new(
        Arc::new(MemoryStore::new()),
        codec.clone(),
    ));
    let app = router(AppState {
        service: service.clone(),
        codec: codec.clone(),
    });
    TestContext {
        app,
        service,
        codec,
    }
}

/// Claims as the authentication gate would attach them for `account`.
pub fn claims_for(account: &Account) -> Claims {
    Claims {
        subject: account.id,
        email: account.email.clone(),
        role: account.role,
        issued_at: Utc::now(),
        expires_at: Utc::now() + Duration::days(7),
    }
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
