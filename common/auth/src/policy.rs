//! Pure authorization decisions over a verified identity and an intended
//! action. All privilege logic lives here so it can be tested without any
//! HTTP or store plumbing.

use crate::roles::Role;

/// A rejected decision carrying a human-readable reason. `NotPermitted`
/// maps to 403; `SelfProtection` mirrors the original wire contract and
/// maps to 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDeny {
    NotPermitted(&'static str),
    SelfProtection(&'static str),
}

impl PolicyDeny {
    pub fn reason(&self) -> &'static str {
        match self {
            PolicyDeny::NotPermitted(reason) | PolicyDeny::SelfProtection(reason) => reason,
        }
    }
}

/// May `actor` set `target`'s role to `requested`?
///
/// Checks run in a fixed order: the creator-grant restriction first, the
/// self-demotion guard second. Role validity is established before this
/// point by parsing `Role`, so every remaining input maps to exactly one
/// allow/deny.
pub fn can_assign_role(
    actor_role: Role,
    actor_id: i64,
    target_role: Role,
    target_id: i64,
    requested: Role,
) -> Result<(), PolicyDeny> {
    if requested == Role::Creator && actor_role != Role::Creator {
        return Err(PolicyDeny::NotPermitted(
            "Only the creator can grant the creator role",
        ));
    }

    if actor_id == target_id && target_role == Role::Creator && requested != Role::Creator {
        return Err(PolicyDeny::SelfProtection(
            "You cannot remove the creator role from yourself",
        ));
    }

    Ok(())
}

/// May `actor` delete the account `target_id`?
pub fn can_delete(actor_role: Role, actor_id: i64, target_id: i64) -> Result<(), PolicyDeny> {
    if actor_role != Role::Creator {
        return Err(PolicyDeny::NotPermitted("Only the creator can delete users"));
    }

    if actor_id == target_id {
        return Err(PolicyDeny::SelfProtection("You cannot delete your own account"));
    }

    Ok(())
}

/// Whether the role may reach the admin surface at all.
pub fn requires_elevated(role: Role) -> bool {
    role.is_elevated()
}
