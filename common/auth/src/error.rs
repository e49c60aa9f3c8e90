use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("token expired")]
    Expired,
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Expired, malformed, and missing tokens all surface the same way;
        // the distinction stays internal.
        let (status, message) = match &self {
            AuthError::Signing(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            _ => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid authentication token".to_string(),
            ),
        };

        let body = ErrorBody {
            status: "error",
            message,
        };
        (status, Json(body)).into_response()
    }
}
