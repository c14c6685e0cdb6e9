//! Configuration schema definitions.

use std::time::Duration;

/// Immutable settings for one listener lifecycle.
///
/// Constructed once at startup (see [`ServerConfig::from_env`]) and handed to
/// the controller by value. Nothing reads configuration ambiently after start.
///
/// [`ServerConfig::from_env`]: crate::config::ServerConfig::from_env
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080"). Not validated here; a malformed
    /// address surfaces as a bind error when the listener starts.
    pub bind_address: String,

    /// Limit on reading a request head from a connection.
    pub read_timeout: Duration,

    /// Limit on producing and writing a response.
    pub write_timeout: Duration,

    /// How long a keep-alive connection may sit idle before it is closed.
    pub idle_timeout: Duration,

    /// Drain deadline for graceful shutdown. Zero means an immediate
    /// deadline: in-flight connections are closed as soon as shutdown begins.
    pub shutdown_wait: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(60),
            shutdown_wait: Duration::ZERO,
        }
    }
}
