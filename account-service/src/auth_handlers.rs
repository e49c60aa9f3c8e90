use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common_auth::{AuthContext, Role};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::errors::ApiError;
use crate::response::Envelope;
use crate::store::Account;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: Account,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: Account,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<SessionData>>), ApiError> {
    let session = state
        .service
        .register(body.email, body.password, body.name)
        .await?;

    // Only the bootstrap registration can come back with the creator tier.
    let message = if session.account.role == Role::Creator {
        "Registration complete. You are the creator!"
    } else {
        "Registration complete"
    };

    let data = SessionData {
        user: session.account,
        token: session.token,
    };
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(message, data)),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Envelope<SessionData>>, ApiError> {
    let session = state.service.login(body.email, body.password).await?;
    let data = SessionData {
        user: session.account,
        token: session.token,
    };
    Ok(Json(Envelope::ok_with_message("Login successful", data)))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Envelope<UserData>>, ApiError> {
    let account = state.service.current_account(auth.claims.subject).await?;
    Ok(Json(Envelope::ok(UserData { user: account })))
}
