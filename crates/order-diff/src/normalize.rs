//! Identity normalization for order lines as they arrive from the backend.
//!
//! The backend is inconsistent about how a line points at its catalog item:
//! sometimes `itemId` is a bare id string, sometimes it is the populated
//! catalog document (`{"_id": "...", "name": "...", "price": ...}`), and cart
//! entries are catalog documents themselves and only carry `_id`. Both sides
//! of a comparison must go through the same normalization, otherwise the same
//! item shows up as "removed" on one side and "new" on the other.

use serde::{Deserialize, Serialize};

use dinepos_core::{ItemId, Money};

use crate::error::{DiffError, DiffResult};
use crate::item::Item;

/// Reference from a line to its catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    /// Bare catalog id.
    Bare(String),
    /// Populated catalog document.
    Populated(PopulatedRef),
}

/// Populated catalog reference. Only `_id` matters for identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulatedRef {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ItemRef {
    pub fn bare(id: impl Into<String>) -> Self {
        Self::Bare(id.into())
    }

    pub fn populated(id: impl Into<String>) -> Self {
        Self::Populated(PopulatedRef {
            id: Some(id.into()),
            ..PopulatedRef::default()
        })
    }

    fn raw_id(&self) -> Option<&str> {
        match self {
            ItemRef::Bare(id) => Some(id.as_str()),
            ItemRef::Populated(populated) => populated.id.as_deref(),
        }
    }
}

/// One order/cart line in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderLine {
    /// The line's own `_id`. For cart entries this is the catalog id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ready: Option<bool>,
}

impl RawOrderLine {
    /// The reference used for identity: `itemId` when present, otherwise the
    /// line's own `_id`.
    pub fn reference(&self) -> Option<ItemRef> {
        match (&self.item_id, &self.line_id) {
            (Some(reference), _) => Some(reference.clone()),
            (None, Some(id)) => Some(ItemRef::Bare(id.clone())),
            (None, None) => None,
        }
    }

    fn populated(&self) -> Option<&PopulatedRef> {
        match &self.item_id {
            Some(ItemRef::Populated(populated)) => Some(populated),
            _ => None,
        }
    }
}

/// Resolve a reference to its canonical item id.
///
/// `position` is the line's index within its collection and is only used to
/// report which line was malformed.
pub fn normalize_ref(reference: &ItemRef, position: usize) -> DiffResult<ItemId> {
    let invalid = |reason: String| DiffError::InvalidItemReference { position, reason };
    let raw = reference
        .raw_id()
        .ok_or_else(|| invalid("populated reference has no _id".to_string()))?;
    ItemId::new(raw).map_err(|err| invalid(err.to_string()))
}

/// Turn a wire line into a validated [`Item`].
///
/// Name and price come from the line itself (the snapshot taken when it was
/// ordered) and fall back to the populated catalog reference.
pub fn normalize_line(line: &RawOrderLine, position: usize) -> DiffResult<Item> {
    let reference = line
        .reference()
        .ok_or_else(|| DiffError::InvalidItemReference {
            position,
            reason: "line has neither itemId nor _id".to_string(),
        })?;
    let id = normalize_ref(&reference, position)?;

    let populated = line.populated();
    let name = line
        .name
        .clone()
        .or_else(|| populated.and_then(|p| p.name.clone()))
        .unwrap_or_default();
    let unit_price = match line.price.or_else(|| populated.and_then(|p| p.price)) {
        Some(price) => Money::from_major(price)?,
        None => Money::ZERO,
    };

    let item = Item::new(id, name, unit_price, line.quantity)?;
    Ok(match line.is_ready {
        Some(ready) => item.with_ready(ready),
        None => item,
    })
}
