//! Shared utilities for lifecycle integration tests.

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use steward::ServerConfig;

/// Config bound to an ephemeral loopback port.
pub fn ephemeral_config(shutdown_wait: Duration) -> ServerConfig {
    ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        shutdown_wait,
        ..ServerConfig::default()
    }
}

/// Router with a single deliberately slow endpoint at `/slow`.
#[allow(dead_code)]
pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "done"
        }),
    )
}
