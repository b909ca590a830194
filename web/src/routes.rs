//! Router assembly.

use crate::handlers::{health, tickets};
use crate::middleware::{correlation_id_layer, error_path_layer};
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the full application router.
///
/// Ticket routes are nested under `/api/tickets`; health and metrics live
/// at the root. Every request gets a correlation id and a trace span, and
/// every error body records the request path.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let ticket_routes = Router::new()
        .route("/", post(tickets::create_ticket).get(tickets::list_tickets))
        .route("/statistics", get(tickets::statistics))
        .route("/status/:status", get(tickets::list_by_status))
        .route(
            "/:id",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/:id/status", patch(tickets::change_status))
        .route("/:id/close", patch(tickets::close_ticket));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/tickets", ticket_routes)
        .layer(error_path_layer())
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
