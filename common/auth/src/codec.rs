use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::claims::{Claims, ClaimsRepr};
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Issued tokens stay valid this long. There is no revocation: a token
/// outlives role changes and account deletion until it expires.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Stateless HS256 issuer/verifier around a process-wide secret. Both
/// directions are pure CPU work; the codec never touches the store.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Construct a codec with a custom token lifetime. Used by tests to
    /// exercise expiry without waiting.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds: ttl.num_seconds(),
        }
    }

    /// Sign the identity triple into a bearer token expiring `ttl` from now.
    pub fn issue(&self, subject: i64, email: &str, role: Role) -> AuthResult<String> {
        let now = Utc::now();
        let repr = ClaimsRepr {
            sub: subject,
            email: email.to_owned(),
            role: role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &repr, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<ClaimsRepr>(token, &self.decoding_key, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Verification(err.to_string()),
            }
        })?;

        let claims = Claims::try_from(data.claims)?;
        debug!(subject = claims.subject, "verified token");
        Ok(claims)
    }
}
