//! Business metrics for the support desk.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `support_tickets_created_total` - Tickets created
//! - `support_tickets_removed_total` - Tickets removed
//! - `support_status_transitions_total{from,to}` - Status changes, including closes
//! - `support_operations_rejected_total{kind}` - Failed operations by error kind
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use metrics::describe_counter;

/// Tickets created
pub const TICKETS_CREATED: &str = "support_tickets_created_total";
/// Tickets removed
pub const TICKETS_REMOVED: &str = "support_tickets_removed_total";
/// Status transitions by `from`/`to` code
pub const STATUS_TRANSITIONS: &str = "support_status_transitions_total";
/// Rejected operations by error kind
pub const OPERATIONS_REJECTED: &str = "support_operations_rejected_total";

/// Register metric descriptions.
///
/// Call once at startup, after installing a recorder.
pub fn register_metrics() {
    describe_counter!(TICKETS_CREATED, "Total number of support tickets created");
    describe_counter!(TICKETS_REMOVED, "Total number of support tickets removed");
    describe_counter!(
        STATUS_TRANSITIONS,
        "Total number of ticket status changes by source and target status"
    );
    describe_counter!(
        OPERATIONS_REJECTED,
        "Total number of ticket operations rejected, by error kind"
    );
}
