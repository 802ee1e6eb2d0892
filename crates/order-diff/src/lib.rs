//! Order diff engine.
//!
//! Compares a baseline item collection (what the backend or the edit session
//! started from) with a current one (cart, table editor, kitchen ticket) and
//! classifies every line as new, increased, decreased, removed or unchanged.
//!
//! Everything here is deterministic and performs no IO. Callers own fetching,
//! persistence and rendering.

pub mod classify;
pub mod error;
pub mod item;
pub mod normalize;
pub mod policy;
pub mod session;
pub mod summary;

pub use classify::{
    ClassificationTag, ClassifiedItem, ClassifyOptions, OutputOrder, classify, classify_raw,
    classify_with,
};
pub use error::{DiffError, DiffResult};
pub use item::{Item, ItemCollection};
pub use normalize::{ItemRef, RawOrderLine, normalize_line, normalize_ref};
pub use policy::{
    AuthorizationPolicy, NetChangePolicy, ObservedDecreasePolicy, PendingAuthorization,
    ProposedChange, requires_authorization,
};
pub use session::EditSession;
pub use summary::{
    CommonItem, CommonItemsOptions, DiffSummary, changes, common_items_across_orders, is_modified,
    ready_or_done_count, summarize, total_line_count,
};
