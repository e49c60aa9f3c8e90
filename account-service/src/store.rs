use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate email")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A persisted account. The password hash never leaves the process: it is
/// skipped during serialization, so handlers can return the struct as-is.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserStats {
    pub total_users: i64,
    pub creators: i64,
    pub admins: i64,
    pub users: i64,
    pub users_last_7_days: i64,
    pub users_last_30_days: i64,
}

/// Narrow query contract over the credential store. The lifecycle service
/// only ever talks to this trait, which keeps it testable against an
/// in-memory fake.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn count(&self) -> Result<i64, StoreError>;

    /// Insert a new account. The store enforces email uniqueness with a
    /// hard constraint; a violation surfaces as `DuplicateEmail` even when
    /// the caller's logical pre-check raced with a concurrent insert.
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// All accounts, newest-created first.
    async fn list_newest_first(&self) -> Result<Vec<Account>, StoreError>;

    /// Aggregate snapshot computed fresh per call.
    async fn stats(&self) -> Result<UserStats, StoreError>;

    /// Persist a new role and refresh `updated_at`. Returns `None` when the
    /// account no longer exists.
    async fn update_role(&self, id: i64, role: Role) -> Result<Option<Account>, StoreError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    name: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| anyhow!("unknown role '{}' stored for user {}", row.role, row.id))?;

        Ok(Account {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed store sharing one connection pool across request
/// handlers.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        // 23505: unique_violation on the email index.
        if db.code().as_deref() == Some("23505") {
            return StoreError::DuplicateEmail;
        }
    }
    backend(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)
    }

    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO users (email, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.name)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Account::try_from).transpose()
    }

    async fn list_newest_first(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn stats(&self) -> Result<UserStats, StoreError> {
        sqlx::query_as::<_, UserStats>(
            "SELECT
                COUNT(*) AS total_users,
                COUNT(CASE WHEN role = 'creator' THEN 1 END) AS creators,
                COUNT(CASE WHEN role = 'admin' THEN 1 END) AS admins,
                COUNT(CASE WHEN role = 'user' THEN 1 END) AS users,
                COUNT(CASE WHEN created_at > NOW() - INTERVAL '7 days' THEN 1 END) AS users_last_7_days,
                COUNT(CASE WHEN created_at > NOW() - INTERVAL '30 days' THEN 1 END) AS users_last_30_days
             FROM users",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE users SET role = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(role.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Account::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
