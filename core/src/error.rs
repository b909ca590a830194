//! Error types for lifecycle operations.
//!
//! Every failure is scoped to one operation on one ticket and is
//! recoverable by the caller. Transports map the variants to their own
//! status codes; this crate never does.

use crate::types::{TicketId, TicketStatus};
use thiserror::Error;

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, SupportError>;

/// Errors returned by [`TicketService`](crate::TicketService).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    /// The referenced ticket does not exist.
    #[error("support ticket not found with id: {id}")]
    NotFound {
        /// The id that was looked up
        id: TicketId,
    },

    /// A status-dependent precondition of the operation failed.
    #[error("{reason}")]
    BusinessRuleViolation {
        /// Human-readable reason, including the current status label where relevant
        reason: String,
    },

    /// The requested status change is not an edge of the transition table.
    #[error("invalid transition: cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        /// Status the ticket is in
        from: TicketStatus,
        /// Status that was requested
        to: TicketStatus,
    },
}

impl SupportError {
    /// Create a business rule violation.
    #[must_use]
    pub fn business_rule(reason: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used as a metrics label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::BusinessRuleViolation { .. } => "business_rule_violation",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

/// A wire code did not name any variant of the target enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} code: {value}")]
pub struct ParseCodeError {
    kind: &'static str,
    value: String,
}

impl ParseCodeError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
