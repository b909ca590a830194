//! Support desk HTTP server.
//!
//! Wires the lifecycle engine, the Axum router, configuration, tracing and
//! the Prometheus recorder into one process. The binary in `main.rs` is a
//! thin caller of [`run`].

pub mod config;
pub mod shutdown;
pub mod telemetry;

pub use config::{Config, ConfigError, ServerConfig};
pub use telemetry::MetricsError;

use std::sync::Arc;
use support_desk_core::{environment::SystemClock, TicketService, TicketStore};
use support_desk_web::{build_router, AppState};
use tracing::{info, warn};

/// Serve the support desk API until Ctrl+C or SIGTERM.
///
/// After the signal, in-flight requests get `shutdown_timeout` to finish.
///
/// # Errors
///
/// Fails if the bind address is invalid, the listener cannot bind, or the
/// server stops with an I/O error.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.server.bind_addr()?;

    let service = TicketService::new(Arc::new(TicketStore::new()), Arc::new(SystemClock));
    let mut state = AppState::new(Arc::new(service));
    if config.metrics.enabled {
        state = state.with_metrics(telemetry::install_metrics()?);
    }

    let app = build_router(state);

    info!(address = %addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let stop = Arc::new(tokio::sync::Notify::new());
    let graceful = {
        let stop = Arc::clone(&stop);
        async move { stop.notified().await }
    };
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            info!("Server stopped");
            return Ok(());
        },
        () = shutdown::shutdown_signal() => {},
    }

    stop.notify_one();
    match tokio::time::timeout(config.server.shutdown_timeout(), server).await {
        Ok(result) => result??,
        Err(_) => warn!(
            timeout_secs = config.server.shutdown_timeout,
            "Shutdown timeout elapsed, dropping in-flight requests"
        ),
    }

    info!("Server stopped");
    Ok(())
}
