use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Permission, Role, SessionClaims};

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Named feature switches delivered with the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeSet<String>);

impl FeatureFlags {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(flags.into_iter().map(Into::into).collect())
    }

    pub fn is_enabled(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Everything a page or service needs to know about who is acting.
///
/// Immutable; a new login produces a new context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    claims: SessionClaims,
    token: BearerToken,
    #[serde(default)]
    flags: FeatureFlags,
}

impl SessionContext {
    pub fn new(claims: SessionClaims, token: BearerToken, flags: FeatureFlags) -> Self {
        Self {
            claims,
            token,
            flags,
        }
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    pub fn role(&self) -> &Role {
        &self.claims.role
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    /// Whether the role grants `required` (wildcard included). Token expiry
    /// is checked separately by [`crate::authorize`].
    pub fn has_permission(&self, required: &Permission) -> bool {
        self.role()
            .permissions()
            .iter()
            .any(|granted| granted.is_wildcard() || granted == required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn test_context(role: Role) -> SessionContext {
        let now = Utc::now();
        SessionContext::new(
            SessionClaims {
                sub: "user-7".to_string(),
                role,
                issued_at: now,
                expires_at: now + Duration::hours(1),
            },
            BearerToken::new("secret-token"),
            FeatureFlags::new(["kitchen_display", "table_service"]),
        )
    }

    #[test]
    fn debug_output_redacts_token() {
        let ctx = test_context(Role::STAFF);
        let printed = format!("{ctx:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("BearerToken(***)"));
        assert_eq!(ctx.token().expose(), "secret-token");
    }

    #[test]
    fn feature_flags_are_explicit() {
        let ctx = test_context(Role::STAFF);
        assert!(ctx.flags().is_enabled("kitchen_display"));
        assert!(!ctx.flags().is_enabled("loyalty"));
    }

    #[test]
    fn wildcard_grants_everything() {
        let ctx = test_context(Role::ADMIN);
        assert!(ctx.has_permission(&Permission::ORDERS_ITEMS_REDUCE));
        assert!(ctx.has_permission(&Permission::new("reports.export")));
    }

    #[test]
    fn staff_cannot_reduce() {
        let ctx = test_context(Role::STAFF);
        assert!(ctx.has_permission(&Permission::ORDERS_EDIT));
        assert!(!ctx.has_permission(&Permission::ORDERS_ITEMS_REDUCE));
    }
}
