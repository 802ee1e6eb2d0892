use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "orders.edit"). The wildcard `"*"`
/// grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));
    pub const ORDERS_PLACE: Permission = Permission(Cow::Borrowed("orders.place"));
    pub const ORDERS_VIEW: Permission = Permission(Cow::Borrowed("orders.view"));
    pub const ORDERS_EDIT: Permission = Permission(Cow::Borrowed("orders.edit"));
    /// Lower or remove lines the backend already accepted.
    pub const ORDERS_ITEMS_REDUCE: Permission = Permission(Cow::Borrowed("orders.items.reduce"));
    pub const KITCHEN_UPDATE: Permission = Permission(Cow::Borrowed("kitchen.update"));
    pub const MENU_EDIT: Permission = Permission(Cow::Borrowed("menu.edit"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
