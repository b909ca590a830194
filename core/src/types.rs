//! Domain types for the support desk.
//!
//! A ticket starts life as a [`TicketDraft`] with no identity. The store
//! allocates a [`TicketId`] when the draft is first saved and from then on
//! the ticket is a [`Ticket`].

use crate::error::ParseCodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket.
///
/// Allocated by the store, strictly increasing from 1, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Create a `TicketId` from its numeric value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Ticket priority. Informational only; no rule depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Can wait
    Low,
    /// Normal handling
    Medium,
    /// Should be picked up soon
    High,
    /// Service is down or badly degraded
    Critical,
}

impl Priority {
    /// Every priority, lowest first
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Wire code (`LOW`, `MEDIUM`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseCodeError::new("priority", s))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Ticket lifecycle status.
///
/// Allowed moves under a status change:
///
/// | From | To |
/// |---|---|
/// | `Open` | `InProgress`, `Closed` |
/// | `InProgress` | `Resolved`, `Open` |
/// | `Resolved` | `Closed`, `InProgress` |
/// | `Closed` | none |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Newly created or sent back for more work
    Open,
    /// Someone is working on it
    InProgress,
    /// A fix has been delivered
    Resolved,
    /// Terminal
    Closed,
}

impl TicketStatus {
    /// Every status in lifecycle order
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// Wire code (`OPEN`, `IN_PROGRESS`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Human-readable label, used in error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Statuses reachable from `self` in one step (excluding `self`)
    #[must_use]
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::InProgress, Self::Closed],
            Self::InProgress => &[Self::Resolved, Self::Open],
            Self::Resolved => &[Self::Closed, Self::InProgress],
            Self::Closed => &[],
        }
    }

    /// Whether a status change from `self` to `next` is permitted.
    ///
    /// Staying in the same status is always permitted; it is a no-op.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.successors().contains(&next)
    }

    /// `true` for `Closed`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseCodeError::new("status", s))
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// A ticket that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketDraft {
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Initial status
    pub status: TicketStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl TicketDraft {
    /// Creates a draft in `Open` status stamped with `now`
    #[must_use]
    pub const fn new(
        title: String,
        description: String,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            description,
            priority,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach an identity
    #[must_use]
    pub fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A stored support ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Identity assigned by the store
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Creation time, never changes
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if the clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Set the status and refresh `updated_at`.
    ///
    /// No transition check happens here; the service validates first.
    pub fn set_status(&mut self, status: TicketStatus, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }
}

/// Partial update of a ticket's content fields.
///
/// `None` leaves a field unchanged. Blank text is treated like `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
}

impl TicketUpdate {
    /// Empty update
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the new title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the new description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the new priority
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Copy every present, non-blank field onto `ticket`.
    pub fn apply_to(self, ticket: &mut Ticket) {
        if let Some(title) = self.title.filter(|t| !t.trim().is_empty()) {
            ticket.title = title;
        }
        if let Some(description) = self.description.filter(|d| !d.trim().is_empty()) {
            ticket.description = description;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Ticket counts per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatistics {
    /// All tickets
    pub total: u64,
    /// `Open` tickets
    pub open: u64,
    /// `InProgress` tickets
    pub in_progress: u64,
    /// `Resolved` tickets
    pub resolved: u64,
    /// `Closed` tickets
    pub closed: u64,
}

impl TicketStatistics {
    /// Count one ticket in `status`
    pub const fn record(&mut self, status: TicketStatus) {
        self.total += 1;
        match status {
            TicketStatus::Open => self.open += 1,
            TicketStatus::InProgress => self.in_progress += 1,
            TicketStatus::Resolved => self.resolved += 1,
            TicketStatus::Closed => self.closed += 1,
        }
    }
}

impl<'a> FromIterator<&'a Ticket> for TicketStatistics {
    fn from_iter<I: IntoIterator<Item = &'a Ticket>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, ticket| {
            stats.record(ticket.status);
            stats
        })
    }
}
