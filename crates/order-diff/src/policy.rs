//! Authorization policy hook for order edits.
//!
//! Reducing or removing something the backend already accepted (a dish the
//! kitchen may have started) needs a manager's approval. Adding, or undoing an
//! addition made in the same unsubmitted edit, does not. Deciding that needs
//! two distinct baselines:
//!
//! - the **committed** baseline: what the backend last persisted;
//! - the **session** baseline: what the collection looked like when the
//!   current edit started.
//!
//! They are separate parameters everywhere in this module and are never
//! folded into one.

use serde::{Deserialize, Serialize};

use dinepos_core::{ItemId, Money};

use crate::item::ItemCollection;

/// Quantities of one item at the three points an edit cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedChange {
    pub id: ItemId,
    /// `None` when the item was never persisted.
    pub committed_quantity: Option<u32>,
    /// `None` when the item was not present at the start of the session.
    pub session_quantity: Option<u32>,
    pub current_quantity: u32,
}

impl ProposedChange {
    pub fn for_item(
        committed: &ItemCollection,
        session: &ItemCollection,
        current: &ItemCollection,
        id: &ItemId,
    ) -> Self {
        Self {
            id: id.clone(),
            committed_quantity: committed.get(id).map(|item| item.quantity()),
            session_quantity: session.get(id).map(|item| item.quantity()),
            current_quantity: current.quantity_of(id),
        }
    }
}

/// Decides whether a proposed change needs elevated authorization.
///
/// Implementations must be pure: same input, same answer.
pub trait AuthorizationPolicy {
    fn requires_authorization(&self, change: &ProposedChange) -> bool;
}

/// Net change against the committed baseline.
///
/// Only a net reduction of a persisted quantity needs approval, however many
/// intermediate edits happened in the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetChangePolicy;

impl AuthorizationPolicy for NetChangePolicy {
    fn requires_authorization(&self, change: &ProposedChange) -> bool {
        match change.committed_quantity {
            Some(committed) => change.current_quantity < committed,
            None => false,
        }
    }
}

/// Any decrease against the session baseline of a persisted item.
///
/// Stricter than [`NetChangePolicy`]: a reduction from the session starting
/// point asks for approval even when the result is still at or above the
/// committed quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservedDecreasePolicy;

impl AuthorizationPolicy for ObservedDecreasePolicy {
    fn requires_authorization(&self, change: &ProposedChange) -> bool {
        if change.committed_quantity.is_none() {
            return false;
        }
        match change.session_quantity {
            Some(session) => change.current_quantity < session,
            None => false,
        }
    }
}

/// A line that cannot be persisted without approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAuthorization {
    pub id: ItemId,
    pub name: String,
    pub unit_price: Money,
    /// `None` when the flagged item was never persisted.
    pub committed_quantity: Option<u32>,
    pub current_quantity: u32,
}

/// Net-change check for a single item.
pub fn requires_authorization(
    committed: &ItemCollection,
    session: &ItemCollection,
    current: &ItemCollection,
    id: &ItemId,
) -> bool {
    let change = ProposedChange::for_item(committed, session, current, id);
    NetChangePolicy.requires_authorization(&change)
}

/// Every item across the three collections that `policy` flags, ascending by id.
///
/// Each flagged id yields exactly one entry. Name and price come from the
/// most recent collection that still holds the line.
pub(crate) fn pending_authorizations<P>(
    policy: &P,
    committed: &ItemCollection,
    session: &ItemCollection,
    current: &ItemCollection,
) -> Vec<PendingAuthorization>
where
    P: AuthorizationPolicy + ?Sized,
{
    let mut ids: Vec<&ItemId> = committed
        .ids()
        .chain(session.ids())
        .chain(current.ids())
        .collect();
    ids.sort();
    ids.dedup();

    ids.into_iter()
        .filter_map(|id| {
            let change = ProposedChange::for_item(committed, session, current, id);
            if !policy.requires_authorization(&change) {
                return None;
            }
            let shown = current.get(id).or_else(|| session.get(id)).or_else(|| committed.get(id));
            Some(PendingAuthorization {
                id: id.clone(),
                name: shown.map(|item| item.name().to_string()).unwrap_or_default(),
                unit_price: shown.map_or(Money::ZERO, |item| item.unit_price()),
                committed_quantity: change.committed_quantity,
                current_quantity: change.current_quantity,
            })
        })
        .collect()
}
