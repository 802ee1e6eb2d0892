//! Rollups over classified lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dinepos_core::{DomainError, Money};

use crate::classify::ClassifiedItem;
use crate::error::DiffResult;

/// Caller-facing rollup of one classification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    /// Lines that are not removed.
    pub total_line_count: usize,
    /// Non-removed lines whose carried ready flag is set.
    pub ready_count: usize,
    pub is_modified: bool,
    /// Baseline quantities priced at the resolved unit price of each line.
    pub baseline_subtotal: Money,
    pub current_subtotal: Money,
    /// `current_subtotal - baseline_subtotal` in minor units.
    pub subtotal_delta: i64,
}

pub fn summarize(items: &[ClassifiedItem]) -> DiffResult<DiffSummary> {
    let mut baseline_subtotal = Money::ZERO;
    let mut current_subtotal = Money::ZERO;
    for item in items {
        let baseline_line = item
            .unit_price
            .checked_mul(item.baseline_quantity.unwrap_or(0))?;
        let current_line = item.unit_price.checked_mul(item.current_quantity)?;
        baseline_subtotal = baseline_subtotal.checked_add(baseline_line)?;
        current_subtotal = current_subtotal.checked_add(current_line)?;
    }

    let subtotal_delta = i64::try_from(Money::delta(baseline_subtotal, current_subtotal))
        .map_err(|_| DomainError::invariant("subtotal delta out of range"))?;

    Ok(DiffSummary {
        total_line_count: total_line_count(items),
        ready_count: ready_or_done_count(items, |item| item.is_ready == Some(true)),
        is_modified: is_modified(items),
        baseline_subtotal,
        current_subtotal,
        subtotal_delta,
    })
}

pub fn total_line_count(items: &[ClassifiedItem]) -> usize {
    items.iter().filter(|item| !item.is_removed()).count()
}

/// Count non-removed lines matching a caller-supplied predicate, e.g. the
/// kitchen display's "ready" or "served" state.
pub fn ready_or_done_count<F>(items: &[ClassifiedItem], predicate: F) -> usize
where
    F: Fn(&ClassifiedItem) -> bool,
{
    items
        .iter()
        .filter(|item| !item.is_removed() && predicate(item))
        .count()
}

/// True if any line is new, increased, decreased or removed.
pub fn is_modified(items: &[ClassifiedItem]) -> bool {
    items.iter().any(|item| item.tag.is_change())
}

/// Only the modified lines, in input order.
pub fn changes(items: &[ClassifiedItem]) -> Vec<&ClassifiedItem> {
    items.iter().filter(|item| item.tag.is_change()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonItemsOptions {
    /// Names whose summed quantity is strictly greater than this are reported.
    pub threshold: u64,
}

impl Default for CommonItemsOptions {
    fn default() -> Self {
        Self { threshold: 1 }
    }
}

/// An item name that is common across several open orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonItem {
    pub name: String,
    pub count: u64,
}

/// Sum current quantities by item name across orders, ignoring removed lines.
///
/// Results are sorted by count (descending) then name.
pub fn common_items_across_orders<I>(orders: I, options: CommonItemsOptions) -> Vec<CommonItem>
where
    I: IntoIterator,
    I::Item: AsRef<[ClassifiedItem]>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for order in orders {
        for item in order.as_ref().iter().filter(|item| !item.is_removed()) {
            *counts.entry(item.name.clone()).or_default() += u64::from(item.current_quantity);
        }
    }

    let mut common: Vec<CommonItem> = counts
        .into_iter()
        .filter(|(_, count)| *count > options.threshold)
        .map(|(name, count)| CommonItem { name, count })
        .collect();
    common.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    common
}
