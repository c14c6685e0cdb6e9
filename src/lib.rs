//! steward: minimal HTTP service bootstrap with a managed lifecycle.
//!
//! # Architecture Overview
//!
//! ```text
//!  environment ──▶ config ──▶ lifecycle controller ──▶ net listener
//!  (STEWARD_*)                      │                      │
//!                                   │                accepted conns
//!                                   │                      ▼
//!                            startup channel         http router
//!                                   │              (CORS + timeouts)
//!                                   ▼
//!                        foreground: wait for interrupt,
//!                        then bounded drain and exit 0
//! ```
//!
//! The controller starts the listener on a background task without blocking
//! its caller, waits for a single interrupt, then drains in-flight
//! connections until they finish or the configured deadline elapses,
//! whichever comes first.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;

pub use config::{ConfigError, ServerConfig};
pub use lifecycle::{LifecycleController, ServerHandle, ServerState};
