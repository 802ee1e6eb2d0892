use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use dinepos_core::{DomainError, Entity, ItemId, Money};

use crate::error::{DiffError, DiffResult};
use crate::normalize::{RawOrderLine, normalize_line};

/// One catalog item as referenced by an order or cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    name: String,
    unit_price: Money,
    quantity: u32,
    /// Kitchen-display "ready" flag, carried through a diff untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_ready: Option<bool>,
}

impl Item {
    /// Build an item, rejecting negative quantities instead of clamping them.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> DiffResult<Self> {
        if quantity < 0 {
            return Err(DiffError::NegativeQuantity { id, quantity });
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| DomainError::validation(format!("quantity {quantity} is out of range")))?;

        Ok(Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            is_ready: None,
        })
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.is_ready = Some(ready);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_ready(&self) -> Option<bool> {
        self.is_ready
    }

    pub fn line_total(&self) -> DiffResult<Money> {
        Ok(self.unit_price.checked_mul(self.quantity)?)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Set of items keyed by id.
///
/// Ids are unique within a collection. A quantity of zero is the same as the
/// item being absent, so zero-quantity entries are dropped on insertion. The
/// original insertion order is remembered for callers that render in that
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCollection {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, failing on the first duplicate id.
    ///
    /// Duplicates are detected even when one of the entries has quantity zero:
    /// two entries for one id make the intended quantity ambiguous.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> DiffResult<Self> {
        let mut collection = Self::new();
        let mut seen: HashSet<ItemId> = HashSet::new();
        for item in items {
            if !seen.insert(item.id.clone()) {
                return Err(DiffError::DuplicateIdInCollection { id: item.id });
            }
            collection.push_unchecked(item);
        }
        Ok(collection)
    }

    /// Normalize wire lines and build a collection from them.
    pub fn from_raw(lines: &[RawOrderLine]) -> DiffResult<Self> {
        let items = lines
            .iter()
            .enumerate()
            .map(|(position, line)| normalize_line(line, position))
            .collect::<DiffResult<Vec<_>>>()?;
        Self::from_items(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Quantity of `id`, zero when absent.
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.get(id).map_or(0, Item::quantity)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    /// Add an item that is not yet in the collection.
    pub fn insert(&mut self, item: Item) -> DiffResult<()> {
        if self.contains(&item.id) {
            return Err(DiffError::DuplicateIdInCollection { id: item.id });
        }
        self.push_unchecked(item);
        Ok(())
    }

    /// Change the quantity of an existing item. Zero removes it.
    pub fn set_quantity(&mut self, id: &ItemId, quantity: u32) -> DiffResult<()> {
        let Some(&i) = self.index.get(id) else {
            return Err(DiffError::UnknownItem { id: id.clone() });
        };
        if quantity == 0 {
            self.remove(id);
        } else {
            self.items[i].quantity = quantity;
        }
        Ok(())
    }

    /// Flip the carried ready flag of an existing item.
    pub fn set_ready(&mut self, id: &ItemId, ready: bool) -> DiffResult<()> {
        let Some(&i) = self.index.get(id) else {
            return Err(DiffError::UnknownItem { id: id.clone() });
        };
        self.items[i].is_ready = Some(ready);
        Ok(())
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let i = self.index.remove(id)?;
        let removed = self.items.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> DiffResult<Money> {
        self.items
            .iter()
            .try_fold(Money::ZERO, |acc, item| Ok(acc.checked_add(item.line_total()?)?))
    }

    fn push_unchecked(&mut self, item: Item) {
        if item.quantity == 0 {
            return;
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }
}

impl Serialize for ItemCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ItemCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Item>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}
