//! Application state for Axum handlers.

use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use support_desk_core::TicketService;

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// let service = Arc::new(TicketService::new(store, Arc::new(SystemClock)));
/// let state = AppState::new(service).with_metrics(prometheus_handle);
/// let app = build_router(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle engine
    pub service: Arc<TicketService>,
    /// Renders `/metrics`; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state without a metrics handle.
    #[must_use]
    pub const fn new(service: Arc<TicketService>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle used by `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl FromRef<AppState> for Arc<TicketService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.service)
    }
}
