use axum::extract::{Path, State};
use axum::Json;
use common_auth::{ensure_elevated, AuthContext};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth_handlers::UserData;
use crate::errors::ApiError;
use crate::response::Envelope;
use crate::store::{Account, UserStats};

#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<Account>,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub stats: UserStats,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    #[serde(default)]
    pub role: String,
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Envelope<UsersData>>, ApiError> {
    ensure_elevated(&auth.claims)?;
    let users = state.service.list_accounts().await?;
    Ok(Json(Envelope::ok(UsersData { users })))
}

pub async fn user_stats(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Envelope<StatsData>>, ApiError> {
    ensure_elevated(&auth.claims)?;
    let stats = state.service.stats().await?;
    Ok(Json(Envelope::ok(StatsData { stats })))
}

pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<Json<Envelope<UserData>>, ApiError> {
    ensure_elevated(&auth.claims)?;
    let user = state
        .service
        .change_role(&auth.claims, user_id, &body.role)
        .await?;
    Ok(Json(Envelope::ok_with_message("Role updated", UserData { user })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    ensure_elevated(&auth.claims)?;
    state.service.delete_account(&auth.claims, user_id).await?;
    Ok(Json(Envelope::message_only("User deleted")))
}
