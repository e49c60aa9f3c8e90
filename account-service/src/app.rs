use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use common_auth::TokenCodec;

use crate::admin_handlers::{delete_user, list_users, update_role, user_stats};
use crate::auth_handlers::{login, me, register};
use crate::response::Envelope;
use crate::service::AccountService;

/// Shared application state. The codec is read-only after startup; the
/// service owns the pooled store.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub codec: Arc<TokenCodec>,
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

async fn health() -> Json<Envelope<()>> {
    Json(Envelope::message_only("account-service is running"))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/stats", get(user_stats))
        .route("/api/admin/users/:user_id/role", put(update_role))
        .route("/api/admin/users/:user_id", delete(delete_user))
        .with_state(state)
}
