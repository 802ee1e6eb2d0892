//! Diff engine error model.

use thiserror::Error;

use dinepos_core::{DomainError, ItemId};

pub type DiffResult<T> = Result<T, DiffError>;

/// Errors raised while building or comparing item collections.
///
/// Every variant fails the whole call: a single bad line can misattribute an
/// unrelated item as new or removed, so no partial result is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// A line carried neither a direct id nor a populated reference with a
    /// usable id. `reason` says which.
    #[error("invalid item reference at position {position}: {reason}")]
    InvalidItemReference { position: usize, reason: String },

    #[error("negative quantity {quantity} for item {id}")]
    NegativeQuantity { id: ItemId, quantity: i64 },

    #[error("item {id} appears more than once in the same collection")]
    DuplicateIdInCollection { id: ItemId },

    /// An edit referenced an item that is not in the collection being edited.
    #[error("unknown item {id}")]
    UnknownItem { id: ItemId },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
