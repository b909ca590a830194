//! Configuration management for the support desk server.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `HOST` is not an IP address
    #[error("invalid bind address: {host}:{port}")]
    InvalidAddress {
        /// Configured host
        host: String,
        /// Configured port
        port: u16,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Metrics configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub enabled: bool,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    ///
    /// Missing or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            metrics: MetricsConfig {
                enabled: lookup("METRICS_ENABLED")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
        }
    }
}

impl ServerConfig {
    /// Socket address to listen on.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidAddress`] if `host` is not an IPv4 or IPv6 address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.host
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.port))
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }

    /// How long in-flight requests may run after a shutdown signal
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.shutdown_timeout(), Duration::from_secs(30));
        assert!(config.metrics.enabled);
        assert_eq!(
            config.server.bind_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("METRICS_ENABLED", "false"),
            ("SHUTDOWN_TIMEOUT", "5"),
        ]);
        assert_eq!(
            config.server.bind_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
        assert!(!config.metrics.enabled);
        assert_eq!(config.server.shutdown_timeout, 5);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = load(&[("PORT", "eighty"), ("METRICS_ENABLED", "yes")]);
        assert_eq!(config.server.port, 8080);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_invalid_host() {
        let config = load(&[("HOST", "not a host")]);
        assert_eq!(
            config.server.bind_addr().unwrap_err(),
            ConfigError::InvalidAddress {
                host: "not a host".to_string(),
                port: 8080,
            }
        );
    }
}
