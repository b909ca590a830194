//! # Support Desk Testing
//!
//! Testing utilities and helpers for the support desk.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - Builders for a [`TicketService`] wired to a fresh store
//! - Helpers that drive a ticket into any status along valid edges
//! - `proptest` strategies for domain types
//!
//! ## Example
//!
//! ```
//! use support_desk_core::{Priority, TicketStatus};
//! use support_desk_testing::helpers::{test_service, ticket_in_status};
//!
//! let (service, _clock) = test_service();
//! let ticket = ticket_in_status(&service, TicketStatus::Resolved);
//! assert_eq!(ticket.status, TicketStatus::Resolved);
//! assert!(service.close(ticket.id).is_ok());
//! ```

use chrono::{DateTime, Utc};
use support_desk_core::environment::Clock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use support_desk_testing::mocks::FixedClock;
    /// use support_desk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Lets tests observe `updated_at` refreshes without sleeping.
    ///
    /// ```
    /// use support_desk_testing::mocks::ManualClock;
    /// use support_desk_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = ManualClock::new(Utc::now());
    /// let before = clock.now();
    /// clock.advance(Duration::minutes(5));
    /// assert_eq!(clock.now() - before, Duration::minutes(5));
    /// ```
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward (or backward, for a negative duration)
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Clock that moves forward by a fixed step on every read.
    ///
    /// Every reading is distinct, so the order of `updated_at` values is the
    /// order in which the clock was read.
    #[derive(Debug)]
    pub struct TickingClock {
        time: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl TickingClock {
        /// Start at `time`, advancing `step` per read
        #[must_use]
        pub const fn new(time: DateTime<Utc>, step: Duration) -> Self {
            Self {
                time: Mutex::new(time),
                step,
            }
        }
    }

    impl Clock for TickingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += self.step;
            *time
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }
}

/// Test helpers and utilities
pub mod helpers {
    use super::mocks::{epoch, ManualClock};
    use std::sync::Arc;
    use support_desk_core::{Priority, Ticket, TicketService, TicketStatus, TicketStore};

    /// A service over an empty store and a [`ManualClock`] stopped at [`epoch`].
    ///
    /// The clock is returned so the test can advance it.
    #[must_use]
    pub fn test_service() -> (TicketService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(epoch()));
        let service = TicketService::new(Arc::new(TicketStore::new()), clock.clone());
        (service, clock)
    }

    /// Create a ticket with valid sample content.
    #[must_use]
    pub fn sample_ticket(service: &TicketService) -> Ticket {
        service.create(
            "Printer offline",
            "The third floor printer stopped responding",
            Priority::Medium,
        )
    }

    /// The shortest chain of valid `change_status` targets from `Open` to `status`.
    #[must_use]
    pub const fn path_to(status: TicketStatus) -> &'static [TicketStatus] {
        match status {
            TicketStatus::Open => &[],
            TicketStatus::InProgress => &[TicketStatus::InProgress],
            TicketStatus::Resolved => &[TicketStatus::InProgress, TicketStatus::Resolved],
            TicketStatus::Closed => &[TicketStatus::Closed],
        }
    }

    /// Create a sample ticket and walk it to `status` along valid edges.
    ///
    /// # Panics
    ///
    /// Panics if the service rejects an edge of [`path_to`], which means the
    /// transition table is broken.
    #[must_use]
    #[allow(clippy::panic)]
    pub fn ticket_in_status(service: &TicketService, status: TicketStatus) -> Ticket {
        let mut ticket = sample_ticket(service);
        for &next in path_to(status) {
            ticket = match service.change_status(ticket.id, next) {
                Ok(ticket) => ticket,
                Err(err) => panic!("valid edge to {next} rejected: {err}"),
            };
        }
        ticket
    }

    /// Install a `fmt` subscriber that writes through the test harness.
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("support_desk=debug")
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use support_desk_core::{Priority, TicketStatus};

    /// Any status
    pub fn any_status() -> impl Strategy<Value = TicketStatus> {
        prop::sample::select(TicketStatus::ALL.to_vec())
    }

    /// Any priority
    pub fn any_priority() -> impl Strategy<Value = Priority> {
        prop::sample::select(Priority::ALL.to_vec())
    }

    /// A title that passes web-layer validation (5–100 characters)
    pub fn valid_title() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{4,99}"
    }

    /// A description that passes web-layer validation (10–500 characters)
    pub fn valid_description() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 .,]{9,199}"
    }

    /// A sequence of requested statuses, valid or not
    pub fn status_requests(max_len: usize) -> impl Strategy<Value = Vec<TicketStatus>> {
        prop::collection::vec(any_status(), 0..=max_len)
    }
}

// Re-export commonly used items
pub use helpers::{test_service, ticket_in_status};
pub use mocks::{test_clock, FixedClock, ManualClock, TickingClock};
