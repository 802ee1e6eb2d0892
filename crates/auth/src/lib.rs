//! `dinepos-auth`: explicit session context and authorization checks.
//!
//! Nothing here reads ambient state (browser storage, globals). Whoever needs
//! to know the role, token or feature flags receives a [`SessionContext`].

pub mod authorize;
pub mod claims;
pub mod context;
pub mod permissions;
pub mod roles;

pub use authorize::{Approval, AuthzError, approve_changes, authorize};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use context::{BearerToken, FeatureFlags, SessionContext};
pub use permissions::Permission;
pub use roles::Role;
