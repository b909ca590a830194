//! Lifecycle engine: every business rule for support tickets.
//!
//! Control flow is always caller → [`TicketService`] → [`TicketStore`] →
//! [`TicketService`] → caller. Mutating operations validate and write inside
//! a single store critical section, so two concurrent status changes on the
//! same ticket are serialized and the second one validates against the
//! first one's result. The clock is read inside that section too, so the
//! commit order of a ticket's writes is also its `updated_at` order.

use crate::environment::Clock;
use crate::error::{Result, SupportError};
use crate::metrics::{OPERATIONS_REJECTED, STATUS_TRANSITIONS, TICKETS_CREATED, TICKETS_REMOVED};
use crate::store::TicketStore;
use crate::types::{
    Priority, Ticket, TicketDraft, TicketId, TicketStatistics, TicketStatus, TicketUpdate,
};
use metrics::counter;
use std::sync::Arc;

/// Ticket lifecycle service.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every caller.
#[derive(Clone)]
pub struct TicketService {
    store: Arc<TicketStore>,
    clock: Arc<dyn Clock>,
}

impl TicketService {
    /// Creates a new `TicketService` over `store`, reading time from `clock`
    #[must_use]
    pub fn new(store: Arc<TicketStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The backing store
    #[must_use]
    pub const fn store(&self) -> &Arc<TicketStore> {
        &self.store
    }

    /// Create a ticket in `Open` status.
    ///
    /// Inputs are expected to be validated already.
    #[tracing::instrument(skip(self, title, description), fields(ticket_id))]
    pub fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Ticket {
        let draft = TicketDraft::new(title.into(), description.into(), priority, self.clock.now());
        let ticket = self.store.save(draft);

        tracing::Span::current().record("ticket_id", ticket.id.get());
        counter!(TICKETS_CREATED).increment(1);
        tracing::info!(ticket_id = %ticket.id, "Ticket created");
        ticket
    }

    /// Get a ticket by id.
    ///
    /// # Errors
    ///
    /// [`SupportError::NotFound`] if no ticket has this id.
    pub fn get_by_id(&self, id: TicketId) -> Result<Ticket> {
        self.store
            .find_by_id(id)
            .ok_or(SupportError::NotFound { id })
    }

    /// Every ticket, in no particular order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Ticket> {
        self.store.find_all()
    }

    /// Tickets in `status`, in no particular order.
    #[must_use]
    pub fn list_by_status(&self, status: TicketStatus) -> Vec<Ticket> {
        self.store.find_by_status(status)
    }

    /// Overwrite the present, non-blank fields of `update` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// - [`SupportError::NotFound`] if no ticket has this id
    /// - [`SupportError::BusinessRuleViolation`] if the ticket is closed
    #[tracing::instrument(skip(self, update))]
    pub fn update_fields(&self, id: TicketId, update: TicketUpdate) -> Result<Ticket> {
        let outcome = self.store.modify(id, |ticket| {
            if ticket.status.is_terminal() {
                return Err(SupportError::business_rule("cannot update a closed ticket"));
            }
            update.apply_to(ticket);
            ticket.touch(self.clock.now());
            Ok(ticket.clone())
        });

        let ticket = Self::settle(id, outcome)?;
        tracing::info!(ticket_id = %id, "Ticket fields updated");
        Ok(ticket)
    }

    /// Move a ticket to `new_status` along the transition table.
    ///
    /// Requesting the current status is a no-op: the ticket is returned
    /// unchanged and `updated_at` is not refreshed.
    ///
    /// # Errors
    ///
    /// - [`SupportError::NotFound`] if no ticket has this id
    /// - [`SupportError::InvalidTransition`] if the edge is not in the table
    #[tracing::instrument(skip(self))]
    pub fn change_status(&self, id: TicketId, new_status: TicketStatus) -> Result<Ticket> {
        let outcome = self.store.modify(id, |ticket| {
            let current = ticket.status;
            if current == new_status {
                return Ok((ticket.clone(), None));
            }
            if !current.can_transition_to(new_status) {
                return Err(SupportError::InvalidTransition {
                    from: current,
                    to: new_status,
                });
            }
            ticket.set_status(new_status, self.clock.now());
            Ok((ticket.clone(), Some(current)))
        });

        let (ticket, previous) = Self::settle(id, outcome)?;
        match previous {
            Some(from) => Self::record_transition(id, from, new_status),
            None => tracing::debug!(ticket_id = %id, status = %new_status, "Status unchanged"),
        }
        Ok(ticket)
    }

    /// Close a resolved ticket.
    ///
    /// # Errors
    ///
    /// - [`SupportError::NotFound`] if no ticket has this id
    /// - [`SupportError::BusinessRuleViolation`] unless the ticket is `Resolved`
    #[tracing::instrument(skip(self))]
    pub fn close(&self, id: TicketId) -> Result<Ticket> {
        let outcome = self.store.modify(id, |ticket| {
            if ticket.status != TicketStatus::Resolved {
                return Err(SupportError::business_rule(format!(
                    "only a RESOLVED ticket may be closed, current status: {}",
                    ticket.status.label()
                )));
            }
            ticket.set_status(TicketStatus::Closed, self.clock.now());
            Ok(ticket.clone())
        });

        let ticket = Self::settle(id, outcome)?;
        Self::record_transition(id, TicketStatus::Resolved, TicketStatus::Closed);
        Ok(ticket)
    }

    /// Delete an open ticket.
    ///
    /// # Errors
    ///
    /// - [`SupportError::NotFound`] if no ticket has this id
    /// - [`SupportError::BusinessRuleViolation`] unless the ticket is `Open`;
    ///   the ticket stays stored
    #[tracing::instrument(skip(self))]
    pub fn remove(&self, id: TicketId) -> Result<()> {
        let outcome = self.store.remove_if(id, |ticket| {
            if ticket.status == TicketStatus::Open {
                Ok(())
            } else {
                Err(SupportError::business_rule(format!(
                    "only an OPEN ticket may be removed, current status: {}",
                    ticket.status.label()
                )))
            }
        });

        Self::settle(id, outcome)?;
        counter!(TICKETS_REMOVED).increment(1);
        tracing::info!(ticket_id = %id, "Ticket removed");
        Ok(())
    }

    /// Ticket counts per status, computed in one pass over a snapshot.
    #[must_use]
    pub fn statistics(&self) -> TicketStatistics {
        self.store.find_all().iter().collect()
    }

    /// Turn a store outcome into the operation result, recording rejections.
    fn settle<T>(id: TicketId, outcome: Option<Result<T>>) -> Result<T> {
        let result = outcome.unwrap_or_else(|| Err(SupportError::NotFound { id }));
        if let Err(err) = &result {
            counter!(OPERATIONS_REJECTED, "kind" => err.kind()).increment(1);
            tracing::warn!(ticket_id = %id, kind = err.kind(), error = %err, "Ticket operation rejected");
        }
        result
    }

    fn record_transition(id: TicketId, from: TicketStatus, to: TicketStatus) {
        counter!(STATUS_TRANSITIONS, "from" => from.as_str(), "to" => to.as_str()).increment(1);
        tracing::info!(ticket_id = %id, from = %from, to = %to, "Ticket status changed");
    }
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService")
            .field("tickets", &self.store.count())
            .finish_non_exhaustive()
    }
}
