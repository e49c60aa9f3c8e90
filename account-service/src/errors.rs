use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_auth::{AuthError, GuardError, PolicyDeny};
use thiserror::Error;
use tracing::error;

use crate::response::Envelope;
use crate::store::StoreError;

/// Domain error taxonomy. Every variant maps to exactly one HTTP status;
/// anything unanticipated collapses into `Internal` and is logged rather
/// than leaked to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    SelfAction(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::Backend(source) => ApiError::Internal(source),
        }
    }
}

impl From<PolicyDeny> for ApiError {
    fn from(deny: PolicyDeny) -> Self {
        match deny {
            PolicyDeny::NotPermitted(reason) => ApiError::Forbidden(reason),
            PolicyDeny::SelfProtection(reason) => ApiError::SelfAction(reason),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(_: GuardError) -> Self {
        ApiError::Forbidden("Insufficient permissions")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        // The only AuthError reachable from the lifecycle service is a
        // signing failure; everything else is handled by the extractor.
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::DuplicateEmail | ApiError::SelfAction(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(source) => {
                error!(error = ?source, "request failed with internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Envelope::<()>::error(self.to_string());
        (status, Json(body)).into_response()
    }
}
