//! Support desk HTTP server.
//!
//! # Usage
//!
//! ```bash
//! HOST=127.0.0.1 PORT=8080 cargo run -p support-desk-server
//! ```

use support_desk_server::{telemetry, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();
    tracing::info!("Starting Support Desk Server");

    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        log_level = %config.server.log_level,
        metrics_enabled = config.metrics.enabled,
        "Configuration loaded"
    );

    support_desk_server::run(config).await
}
