//! Line classification between a baseline and a current collection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use dinepos_core::{Entity, ItemId, Money};

use crate::error::{DiffError, DiffResult};
use crate::item::{Item, ItemCollection};
use crate::normalize::RawOrderLine;

/// How a line changed between baseline and current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationTag {
    New,
    Increased,
    Decreased,
    Removed,
    Unchanged,
}

impl ClassificationTag {
    /// True for every tag except `Unchanged`.
    pub fn is_change(self) -> bool {
        !matches!(self, ClassificationTag::Unchanged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationTag::New => "new",
            ClassificationTag::Increased => "increased",
            ClassificationTag::Decreased => "decreased",
            ClassificationTag::Removed => "removed",
            ClassificationTag::Unchanged => "unchanged",
        }
    }
}

impl core::fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedItem {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Money,
    /// Zero for removed lines.
    pub current_quantity: u32,
    /// `None` for new lines.
    pub baseline_quantity: Option<u32>,
    pub tag: ClassificationTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ready: Option<bool>,
}

impl ClassifiedItem {
    /// Signed quantity change from baseline to current.
    pub fn delta(&self) -> i64 {
        i64::from(self.current_quantity) - i64::from(self.baseline_quantity.unwrap_or(0))
    }

    pub fn is_removed(&self) -> bool {
        self.tag == ClassificationTag::Removed
    }
}

/// Output ordering of [`classify_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrder {
    /// Ascending by item id.
    #[default]
    ById,
    /// Current-collection insertion order, then baseline-only ids in baseline
    /// insertion order.
    Insertion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    #[serde(default)]
    pub order: OutputOrder,
}

/// Classify every id in `baseline ∪ current`, ascending by id.
pub fn classify(
    baseline: &ItemCollection,
    current: &ItemCollection,
) -> DiffResult<Vec<ClassifiedItem>> {
    classify_with(baseline, current, ClassifyOptions::default())
}

/// Classify every id in `baseline ∪ current`.
///
/// Exactly one [`ClassifiedItem`] is produced per id. The result only depends
/// on the contents of the two collections (and `options.order` for ordering),
/// never on how the caller built them.
pub fn classify_with(
    baseline: &ItemCollection,
    current: &ItemCollection,
    options: ClassifyOptions,
) -> DiffResult<Vec<ClassifiedItem>> {
    let ids: Vec<&ItemId> = match options.order {
        OutputOrder::ById => baseline
            .ids()
            .chain(current.ids())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        OutputOrder::Insertion => current
            .ids()
            .chain(baseline.ids().filter(|id| !current.contains(id)))
            .collect(),
    };

    ids.into_iter()
        .map(|id| classify_one(id, baseline.get(id), current.get(id)))
        .collect()
}

/// Normalize both sides from wire lines, then classify.
pub fn classify_raw(
    baseline: &[RawOrderLine],
    current: &[RawOrderLine],
) -> DiffResult<Vec<ClassifiedItem>> {
    let baseline = ItemCollection::from_raw(baseline)?;
    let current = ItemCollection::from_raw(current)?;
    classify(&baseline, &current)
}

fn classify_one(
    id: &ItemId,
    baseline: Option<&Item>,
    current: Option<&Item>,
) -> DiffResult<ClassifiedItem> {
    // A zero quantity counts as absence.
    let current = current.filter(|item| item.quantity() > 0);

    match (baseline, current) {
        (None, Some(c)) => Ok(from_item(c, c.quantity(), None, ClassificationTag::New)),
        (Some(b), None) => Ok(from_item(b, 0, Some(b.quantity()), ClassificationTag::Removed)),
        (Some(b), Some(c)) => {
            let tag = match c.quantity().cmp(&b.quantity()) {
                core::cmp::Ordering::Greater => ClassificationTag::Increased,
                core::cmp::Ordering::Less => ClassificationTag::Decreased,
                core::cmp::Ordering::Equal => ClassificationTag::Unchanged,
            };
            Ok(from_item(c, c.quantity(), Some(b.quantity()), tag))
        }
        (None, None) => Err(DiffError::InvariantViolation(format!(
            "item {id} is absent from both collections"
        ))),
    }
}

/// Name, price and ready flag come from `source`: the current line when there
/// is one, the baseline line for removals.
fn from_item(
    source: &Item,
    current_quantity: u32,
    baseline_quantity: Option<u32>,
    tag: ClassificationTag,
) -> ClassifiedItem {
    ClassifiedItem {
        id: source.id().clone(),
        name: source.name().to_string(),
        unit_price: source.unit_price(),
        current_quantity,
        baseline_quantity,
        tag,
        is_ready: source.is_ready(),
    }
}
