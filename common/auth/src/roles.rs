use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Privilege tier attached to every account. Ordered `user < admin < creator`,
/// though the ordering only governs who may grant what, not a generic
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Creator,
}

pub const ALL_ROLES: &[Role] = &[Role::User, Role::Admin, Role::Creator];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Creator => "creator",
        }
    }

    /// Whether the role may reach the admin surface (listing, stats,
    /// role changes). Deletion additionally requires `creator`.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Creator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "creator" => Ok(Role::Creator),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
