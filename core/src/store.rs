//! In-memory ticket store.
//!
//! Owns every stored ticket and the identity allocator. The store has no
//! business knowledge; [`TicketService`](crate::TicketService) decides what
//! is allowed and uses [`TicketStore::modify`] and [`TicketStore::remove_if`]
//! to validate and write in one critical section.
//!
//! # Thread Safety
//!
//! Tickets live in a `HashMap` behind a `std::sync::RwLock`; the id
//! allocator is an `AtomicU64`. Every method is safe to call from many
//! threads. A poisoned lock is recovered rather than propagated: a panic in
//! another thread cannot leave a half-written ticket because writes replace
//! whole entries.

use crate::types::{Ticket, TicketDraft, TicketId, TicketStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory ticket storage.
///
/// # Example
///
/// ```
/// use support_desk_core::{Priority, TicketDraft, TicketStore};
/// use chrono::Utc;
///
/// let store = TicketStore::new();
/// let ticket = store.save(TicketDraft::new(
///     "VPN drops".to_string(),
///     "VPN disconnects every ten minutes".to_string(),
///     Priority::Medium,
///     Utc::now(),
/// ));
///
/// assert_eq!(ticket.id.get(), 1);
/// assert!(store.exists_by_id(ticket.id));
/// assert_eq!(store.count(), 1);
/// ```
#[derive(Debug)]
pub struct TicketStore {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    next_id: AtomicU64,
}

impl TicketStore {
    /// Create an empty store. The first allocated id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TicketId, Ticket>> {
        self.tickets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TicketId, Ticket>> {
        self.tickets.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate an identity for `draft`, store it and return the ticket.
    ///
    /// This is the only place the allocator advances.
    pub fn save(&self, draft: TicketDraft) -> Ticket {
        let id = TicketId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ticket = draft.into_ticket(id);
        self.write().insert(id, ticket.clone());
        ticket
    }

    /// Look up a ticket.
    #[must_use]
    pub fn find_by_id(&self, id: TicketId) -> Option<Ticket> {
        self.read().get(&id).cloned()
    }

    /// Snapshot of every ticket, in no particular order.
    #[must_use]
    pub fn find_all(&self) -> Vec<Ticket> {
        self.read().values().cloned().collect()
    }

    /// Snapshot of the tickets in `status`, in no particular order.
    #[must_use]
    pub fn find_by_status(&self, status: TicketStatus) -> Vec<Ticket> {
        self.read()
            .values()
            .filter(|ticket| ticket.status == status)
            .cloned()
            .collect()
    }

    /// Overwrite the entry at `ticket.id`.
    pub fn update(&self, ticket: Ticket) -> Ticket {
        self.write().insert(ticket.id, ticket.clone());
        ticket
    }

    /// Remove a ticket. Returns the removed ticket, or `None` if it was absent.
    pub fn delete_by_id(&self, id: TicketId) -> Option<Ticket> {
        self.write().remove(&id)
    }

    /// Whether a ticket with this id is stored.
    #[must_use]
    pub fn exists_by_id(&self, id: TicketId) -> bool {
        self.read().contains_key(&id)
    }

    /// Number of stored tickets.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Remove every ticket. The allocator is not reset, so ids stay unique.
    pub fn delete_all(&self) {
        self.write().clear();
    }

    /// Run `f` against the stored ticket while holding the write lock.
    ///
    /// `f` works on a copy; the copy replaces the stored ticket only when `f`
    /// returns `Ok`. Returns `None` when no ticket has this id.
    pub fn modify<T, E>(
        &self,
        id: TicketId,
        f: impl FnOnce(&mut Ticket) -> Result<T, E>,
    ) -> Option<Result<T, E>> {
        let mut tickets = self.write();
        let stored = tickets.get_mut(&id)?;

        let mut candidate = stored.clone();
        let outcome = f(&mut candidate);
        if outcome.is_ok() {
            *stored = candidate;
        }
        Some(outcome)
    }

    /// Remove the ticket if `check` accepts it, while holding the write lock.
    ///
    /// Returns `None` when no ticket has this id. A rejected ticket stays stored.
    pub fn remove_if<E>(
        &self,
        id: TicketId,
        check: impl FnOnce(&Ticket) -> Result<(), E>,
    ) -> Option<Result<Ticket, E>> {
        let mut tickets = self.write();
        if let Err(err) = check(tickets.get(&id)?) {
            return Some(Err(err));
        }
        tickets.remove(&id).map(Ok)
    }
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use chrono::Utc;
    use std::collections::HashSet;

    fn draft(title: &str) -> TicketDraft {
        TicketDraft::new(
            title.to_string(),
            "Something is broken again".to_string(),
            Priority::Medium,
            Utc::now(),
        )
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = TicketStore::new();
        let first = store.save(draft("First ticket"));
        let second = store.save(draft("Second ticket"));

        assert_eq!(first.id, TicketId::new(1));
        assert_eq!(second.id, TicketId::new(2));
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let store = TicketStore::new();
        let first = store.save(draft("First ticket"));
        store.delete_by_id(first.id);
        let second = store.save(draft("Second ticket"));

        assert_ne!(first.id, second.id);
        assert_eq!(second.id, TicketId::new(2));
    }

    #[test]
    fn test_delete_all_keeps_allocator() {
        let store = TicketStore::new();
        store.save(draft("First ticket"));
        store.save(draft("Second ticket"));
        store.delete_all();

        assert_eq!(store.count(), 0);
        assert_eq!(store.save(draft("Third ticket")).id, TicketId::new(3));
    }

    #[test]
    fn test_missing_id_is_absent_not_error() {
        let store = TicketStore::new();
        let id = TicketId::new(42);

        assert!(store.find_by_id(id).is_none());
        assert!(!store.exists_by_id(id));
        assert!(store.delete_by_id(id).is_none());
        assert!(store.modify(id, |_| Ok::<_, ()>(())).is_none());
        assert!(store.remove_if(id, |_| Ok::<_, ()>(())).is_none());
    }

    #[test]
    fn test_find_by_status_filters() {
        let store = TicketStore::new();
        let open = store.save(draft("Open ticket"));
        let mut resolved = store.save(draft("Resolved ticket"));
        resolved.status = TicketStatus::Resolved;
        store.update(resolved.clone());

        let found = store.find_by_status(TicketStatus::Resolved);
        assert_eq!(found, vec![resolved]);
        assert_eq!(store.find_by_status(TicketStatus::Open), vec![open]);
        assert!(store.find_by_status(TicketStatus::Closed).is_empty());
        assert_eq!(store.find_all().len(), 2);
    }

    #[test]
    fn test_modify_discards_changes_on_error() {
        let store = TicketStore::new();
        let ticket = store.save(draft("Original title"));

        let outcome = store.modify(ticket.id, |t| {
            t.title = "Changed title".to_string();
            Err::<(), _>("rejected")
        });

        assert_eq!(outcome, Some(Err("rejected")));
        assert_eq!(store.find_by_id(ticket.id).unwrap().title, "Original title");
    }

    #[test]
    fn test_modify_commits_on_success() {
        let store = TicketStore::new();
        let ticket = store.save(draft("Original title"));

        let outcome = store.modify(ticket.id, |t| {
            t.title = "Changed title".to_string();
            Ok::<_, ()>(t.clone())
        });

        assert_eq!(outcome.unwrap().unwrap().title, "Changed title");
        assert_eq!(store.find_by_id(ticket.id).unwrap().title, "Changed title");
    }

    #[test]
    fn test_remove_if_rejected_keeps_ticket() {
        let store = TicketStore::new();
        let ticket = store.save(draft("Keep me please"));

        let outcome = store.remove_if(ticket.id, |_| Err("no"));
        assert_eq!(outcome, Some(Err("no")));
        assert!(store.exists_by_id(ticket.id));

        let removed = store.remove_if(ticket.id, |_| Ok::<_, &str>(()));
        assert_eq!(removed, Some(Ok(ticket.clone())));
        assert!(!store.exists_by_id(ticket.id));
    }

    #[test]
    fn test_concurrent_saves_get_distinct_ids() {
        let store = TicketStore::new();

        let ids: Vec<TicketId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..50)
                            .map(|_| store.save(draft("Concurrent ticket")).id)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 400);
        assert_eq!(unique.len(), 400);
        assert_eq!(store.count(), 400);
    }
}
