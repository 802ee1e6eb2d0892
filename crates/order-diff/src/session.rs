//! Per-order edit session.
//!
//! ```text
//! Committed --add--> New(session) --remove before persist--> gone (no approval)
//! Committed --decrement--> Decreased(session) --persist--> needs approval
//! ```
//!
//! A session ends either by `persist` (current becomes the new committed and
//! session baseline) or by `discard` (current is reset to the session
//! baseline; the committed baseline is untouched).

use tracing::{debug, info};

use dinepos_core::{DomainError, Entity, ItemId};

use crate::classify::{ClassifiedItem, classify};
use crate::error::{DiffError, DiffResult};
use crate::item::{Item, ItemCollection};
use crate::policy::{
    AuthorizationPolicy, NetChangePolicy, PendingAuthorization, ProposedChange,
    pending_authorizations,
};

/// Mutable edit over an order, holding both baselines explicitly.
#[derive(Debug, Clone)]
pub struct EditSession<P = NetChangePolicy> {
    committed: ItemCollection,
    session_baseline: ItemCollection,
    current: ItemCollection,
    policy: P,
}

impl EditSession<NetChangePolicy> {
    /// Start editing an order whose persisted state is `committed`.
    pub fn begin(committed: ItemCollection) -> Self {
        Self::with_policy(committed, NetChangePolicy)
    }
}

impl<P: AuthorizationPolicy> EditSession<P> {
    pub fn with_policy(committed: ItemCollection, policy: P) -> Self {
        Self {
            session_baseline: committed.clone(),
            current: committed.clone(),
            committed,
            policy,
        }
    }

    /// Restore a session whose baselines diverged, e.g. a cart that already
    /// held unsubmitted additions when this edit started.
    pub fn resume(
        committed: ItemCollection,
        session_baseline: ItemCollection,
        current: ItemCollection,
        policy: P,
    ) -> Self {
        Self {
            committed,
            session_baseline,
            current,
            policy,
        }
    }

    pub fn committed(&self) -> &ItemCollection {
        &self.committed
    }

    pub fn session_baseline(&self) -> &ItemCollection {
        &self.session_baseline
    }

    pub fn current(&self) -> &ItemCollection {
        &self.current
    }

    /// Add an item, or raise its quantity if it is already in the order.
    pub fn add(&mut self, item: Item) -> DiffResult<()> {
        let id = item.id().clone();
        match self.current.get(&id) {
            Some(existing) => {
                let quantity = existing
                    .quantity()
                    .checked_add(item.quantity())
                    .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
                self.current.set_quantity(&id, quantity)?;
            }
            None => self.current.insert(item)?,
        }
        debug!(item_id = %id, quantity = self.current.quantity_of(&id), "edit session: item added");
        Ok(())
    }

    pub fn set_quantity(&mut self, id: &ItemId, quantity: u32) -> DiffResult<()> {
        self.current.set_quantity(id, quantity)?;
        debug!(item_id = %id, quantity, "edit session: quantity set");
        Ok(())
    }

    pub fn increment(&mut self, id: &ItemId) -> DiffResult<()> {
        let quantity = self.existing_quantity(id)?;
        let next = quantity
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
        self.set_quantity(id, next)
    }

    /// Lower the quantity by one; the line disappears at zero.
    pub fn decrement(&mut self, id: &ItemId) -> DiffResult<()> {
        let quantity = self.existing_quantity(id)?;
        self.set_quantity(id, quantity - 1)
    }

    pub fn remove(&mut self, id: &ItemId) -> DiffResult<Item> {
        let removed = self
            .current
            .remove(id)
            .ok_or_else(|| DiffError::UnknownItem { id: id.clone() })?;
        debug!(item_id = %id, "edit session: item removed");
        Ok(removed)
    }

    pub fn mark_ready(&mut self, id: &ItemId, ready: bool) -> DiffResult<()> {
        self.current.set_ready(id, ready)
    }

    /// True when some quantity differs from the session baseline.
    pub fn is_dirty(&self) -> bool {
        self.current.len() != self.session_baseline.len()
            || self
                .current
                .iter()
                .any(|item| self.session_baseline.quantity_of(item.id()) != item.quantity())
    }

    /// What changed in this session.
    pub fn classify(&self) -> DiffResult<Vec<ClassifiedItem>> {
        classify(&self.session_baseline, &self.current)
    }

    /// What changed relative to what the backend holds.
    pub fn classify_against_committed(&self) -> DiffResult<Vec<ClassifiedItem>> {
        classify(&self.committed, &self.current)
    }

    pub fn requires_authorization(&self, id: &ItemId) -> bool {
        let change =
            ProposedChange::for_item(&self.committed, &self.session_baseline, &self.current, id);
        self.policy.requires_authorization(&change)
    }

    pub fn pending_authorizations(&self) -> Vec<PendingAuthorization> {
        pending_authorizations(
            &self.policy,
            &self.committed,
            &self.session_baseline,
            &self.current,
        )
    }

    /// Finish the session and return the collection to submit.
    ///
    /// `approve` is called with the lines that need authorization (possibly
    /// none). If it fails the session is left untouched.
    pub fn persist<F, E>(&mut self, approve: F) -> Result<ItemCollection, E>
    where
        F: FnOnce(&[PendingAuthorization]) -> Result<(), E>,
    {
        let pending = self.pending_authorizations();
        approve(&pending)?;

        info!(
            lines = self.current.len(),
            approved = pending.len(),
            "edit session persisted"
        );
        self.committed = self.current.clone();
        self.session_baseline = self.current.clone();
        Ok(self.current.clone())
    }

    /// Throw away this session's edits.
    pub fn discard(&mut self) {
        info!(lines = self.current.len(), "edit session discarded");
        self.current = self.session_baseline.clone();
    }

    fn existing_quantity(&self, id: &ItemId) -> DiffResult<u32> {
        self.current
            .get(id)
            .map(Item::quantity)
            .ok_or_else(|| DiffError::UnknownItem { id: id.clone() })
    }
}
