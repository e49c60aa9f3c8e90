pub mod claims;
pub mod codec;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod policy;
pub mod roles;

pub use claims::Claims;
pub use codec::{TokenCodec, TOKEN_TTL_DAYS};
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use guards::{ensure_elevated, GuardError};
pub use policy::{can_assign_role, can_delete, requires_elevated, PolicyDeny};
pub use roles::{Role, ALL_ROLES};
