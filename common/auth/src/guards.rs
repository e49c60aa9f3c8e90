use thiserror::Error;

use crate::claims::Claims;
use crate::policy::requires_elevated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("insufficient permissions")]
    InsufficientRole,
}

/// Gate for the admin surface: both `admin` and `creator` pass. Finer
/// decisions (who deletes, who grants creator) belong to [`crate::policy`].
pub fn ensure_elevated(claims: &Claims) -> Result<(), GuardError> {
    if requires_elevated(claims.role) {
        Ok(())
    } else {
        Err(GuardError::InsufficientRole)
    }
}
