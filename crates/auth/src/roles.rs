use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier issued by the backend with the session token.
///
/// Roles are opaque strings; unknown roles are carried through and simply
/// grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const CUSTOMER: Role = Role(Cow::Borrowed("customer"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Permissions granted by this role.
    pub fn permissions(&self) -> Vec<Permission> {
        match self.as_str() {
            "admin" => vec![Permission::WILDCARD],
            "manager" => vec![
                Permission::ORDERS_VIEW,
                Permission::ORDERS_EDIT,
                Permission::ORDERS_ITEMS_REDUCE,
                Permission::KITCHEN_UPDATE,
                Permission::MENU_EDIT,
            ],
            "staff" => vec![
                Permission::ORDERS_VIEW,
                Permission::ORDERS_EDIT,
                Permission::KITCHEN_UPDATE,
            ],
            "customer" => vec![Permission::ORDERS_PLACE],
            _ => Vec::new(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_managers_and_admins_can_reduce_orders() {
        let reduce = Permission::ORDERS_ITEMS_REDUCE;
        assert!(Role::MANAGER.permissions().contains(&reduce));
        assert!(!Role::STAFF.permissions().contains(&reduce));
        assert!(!Role::CUSTOMER.permissions().contains(&reduce));
        assert!(Role::ADMIN.permissions().iter().any(Permission::is_wildcard));
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        assert!(Role::new("cashier-trainee").permissions().is_empty());
    }

    #[test]
    fn roles_serialize_as_plain_strings() {
        let json = serde_json::to_string(&Role::MANAGER).unwrap();
        assert_eq!(json, "\"manager\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::STAFF);
    }
}
