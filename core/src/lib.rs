//! # Support Desk Core
//!
//! Ticket lifecycle engine and the in-memory store it operates on.
//!
//! This crate contains every business rule of the support desk:
//!
//! - **Store** ([`store::TicketStore`]): keyed, thread-safe storage with an
//!   identity allocator that never reuses ids
//! - **Lifecycle engine** ([`service::TicketService`]): creation defaults,
//!   field updates, the status transition table, close/remove eligibility
//!   and statistics
//! - **Environment** ([`environment::Clock`]): injected time source
//!
//! The crate knows nothing about HTTP, JSON or routing. Callers invoke the
//! typed operations and render [`SupportError`] however their transport
//! requires.
//!
//! ## Status Machine
//!
//! ```text
//!            ┌──────────────┐
//!   create → │     OPEN     │ ──────────────┐
//!            └──────────────┘               │
//!               │        ▲                  │
//!               ▼        │                  │
//!            ┌──────────────┐               │
//!            │ IN_PROGRESS  │               │
//!            └──────────────┘               │
//!               │        ▲                  │
//!               ▼        │                  ▼
//!            ┌──────────────┐        ┌──────────────┐
//!            │   RESOLVED   │ ─────→ │    CLOSED    │ (terminal)
//!            └──────────────┘        └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use support_desk_core::{
//!     environment::SystemClock, Priority, TicketService, TicketStatus, TicketStore,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), support_desk_core::SupportError> {
//! let service = TicketService::new(Arc::new(TicketStore::new()), Arc::new(SystemClock));
//!
//! let ticket = service.create("Slow system", "System is slow after update", Priority::High);
//! assert_eq!(ticket.status, TicketStatus::Open);
//!
//! service.change_status(ticket.id, TicketStatus::InProgress)?;
//! service.change_status(ticket.id, TicketStatus::Resolved)?;
//! let closed = service.close(ticket.id)?;
//! assert_eq!(closed.status, TicketStatus::Closed);
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error;
pub mod metrics;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use error::{ParseCodeError, Result, SupportError};
pub use service::TicketService;
pub use store::TicketStore;
pub use types::{
    Priority, Ticket, TicketDraft, TicketId, TicketStatistics, TicketStatus, TicketUpdate,
};
