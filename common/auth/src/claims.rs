use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::roles::Role;

/// Application-focused representation of a verified token payload: the
/// identity triple plus issue/expiry times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub subject: i64,
    pub email: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Wire form of the payload as it is signed into the token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> Result<Self, Self::Error> {
        let role: Role = value
            .role
            .parse()
            .map_err(|_| AuthError::InvalidClaim("role", value.role.clone()))?;

        let issued_at = Utc
            .timestamp_opt(value.iat, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("iat", value.iat.to_string()))?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", value.exp.to_string()))?;

        Ok(Self {
            subject: value.sub,
            email: value.email,
            role,
            issued_at,
            expires_at,
        })
    }
}
