use std::sync::Arc;

use common_auth::{can_assign_role, can_delete, Claims, Role, TokenCodec, ALL_ROLES};
use tracing::info;

use crate::errors::ApiError;
use crate::password;
use crate::store::{Account, NewAccount, UserStats, UserStore};

const MIN_PASSWORD_CHARS: usize = 6;

/// A freshly authenticated account together with its bearer token.
#[derive(Debug)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

/// Orchestrates registration, login, role mutation, and deletion by
/// composing the hasher, token codec, policy, and store. All operations
/// are request-scoped; the only shared state is the codec's secret and the
/// pooled store behind the trait object.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    pub async fn register(
        &self,
        email: String,
        password: String,
        name: Option<String>,
    ) -> Result<AuthSession, ApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ApiError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        // Fast-path duplicate check for a friendly error. The store's
        // uniqueness constraint remains the real guard: a racing insert
        // still comes back as DuplicateEmail.
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        // First account in an empty store bootstraps the creator tier;
        // evaluated against current state, not history.
        let role = if self.store.count().await? == 0 {
            Role::Creator
        } else {
            Role::User
        };

        let password_hash = password::hash(&password)?;
        let name = name.and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        let account = self
            .store
            .insert(NewAccount {
                email,
                password_hash,
                name,
                role,
            })
            .await?;

        let token = self
            .codec
            .issue(account.id, &account.email, account.role)?;

        info!(user_id = account.id, role = %account.role, "registered new account");

        Ok(AuthSession { account, token })
    }

    pub async fn login(&self, email: String, password: String) -> Result<AuthSession, ApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        // Unknown email and wrong password must be indistinguishable.
        let account = match self.store.find_by_email(&email).await? {
            Some(account) => account,
            None => return Err(ApiError::InvalidCredentials),
        };

        if !password::verify(&password, &account.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self
            .codec
            .issue(account.id, &account.email, account.role)?;

        Ok(AuthSession { account, token })
    }

    /// Live re-fetch by id. A token can outlive its account; the gate
    /// accepts it, but this lookup rejects.
    pub async fn current_account(&self, id: i64) -> Result<Account, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("User not found"))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        Ok(self.store.list_newest_first().await?)
    }

    pub async fn stats(&self) -> Result<UserStats, ApiError> {
        Ok(self.store.stats().await?)
    }

    pub async fn change_role(
        &self,
        actor: &Claims,
        target_id: i64,
        requested: &str,
    ) -> Result<Account, ApiError> {
        let requested: Role = requested.parse().map_err(|_| {
            let valid = ALL_ROLES
                .iter()
                .map(|role| role.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            ApiError::Validation(format!("Invalid role. Valid roles: {valid}"))
        })?;

        let target = self
            .store
            .find_by_id(target_id)
            .await?
            .ok_or(ApiError::NotFound("User not found"))?;

        can_assign_role(actor.role, actor.subject, target.role, target.id, requested)?;

        let updated = self
            .store
            .update_role(target_id, requested)
            .await?
            .ok_or(ApiError::NotFound("User not found"))?;

        info!(
            actor_id = actor.subject,
            user_id = updated.id,
            role = %updated.role,
            "changed account role"
        );

        Ok(updated)
    }

    pub async fn delete_account(&self, actor: &Claims, target_id: i64) -> Result<(), ApiError> {
        let target = self
            .store
            .find_by_id(target_id)
            .await?
            .ok_or(ApiError::NotFound("User not found"))?;

        can_delete(actor.role, actor.subject, target.id)?;

        if !self.store.delete(target_id).await? {
            return Err(ApiError::NotFound("User not found"));
        }

        info!(actor_id = actor.subject, user_id = target_id, "deleted account");
        Ok(())
    }
}
