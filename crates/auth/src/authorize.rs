use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use dinepos_core::ItemId;

use crate::{Permission, Role, SessionContext, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("session is not valid: {0}")]
    SessionExpired(#[from] TokenValidationError),

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("manager approval required for {} item(s)", .items.len())]
    ApprovalRequired { items: Vec<ItemId> },
}

/// Check that `ctx` is live at `now` and grants `required`.
///
/// - No IO
/// - No panics
pub fn authorize(
    ctx: &SessionContext,
    required: &Permission,
    now: DateTime<Utc>,
) -> Result<(), AuthzError> {
    validate_claims(ctx.claims(), now)?;

    if ctx.has_permission(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Outcome of [`approve_changes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Approval {
    /// Nothing in the edit needed approval.
    NotRequired,
    /// Approved by the named session (the actor or a manager at the terminal).
    GrantedBy { subject: String, role: Role },
}

/// Gate for persisting edits that reduce already-accepted lines.
///
/// `items` are the lines flagged by the order-diff policy hook. `approver` is
/// the session of whoever confirmed at the terminal (typically a manager who
/// entered a PIN); the caller resolves the PIN into that session.
pub fn approve_changes(
    actor: &SessionContext,
    approver: Option<&SessionContext>,
    items: &[ItemId],
    now: DateTime<Utc>,
) -> Result<Approval, AuthzError> {
    authorize(actor, &Permission::ORDERS_EDIT, now)?;

    if items.is_empty() {
        return Ok(Approval::NotRequired);
    }

    if actor.has_permission(&Permission::ORDERS_ITEMS_REDUCE) {
        return Ok(granted_by(actor));
    }

    if let Some(approver) = approver {
        validate_claims(approver.claims(), now)?;
        if approver.has_permission(&Permission::ORDERS_ITEMS_REDUCE) {
            return Ok(granted_by(approver));
        }
    }

    warn!(
        actor = actor.subject(),
        role = %actor.role(),
        items = items.len(),
        "order reduction denied without manager approval"
    );
    Err(AuthzError::ApprovalRequired {
        items: items.to_vec(),
    })
}

fn granted_by(ctx: &SessionContext) -> Approval {
    Approval::GrantedBy {
        subject: ctx.subject().to_string(),
        role: ctx.role().clone(),
    }
}
