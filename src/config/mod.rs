//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (STEWARD_PORT, STEWARD_WAIT)
//!     → env.rs (lookup, default substitution)
//!     → ServerConfig (immutable)
//!     → passed by value into the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - Config is built exactly once at startup; the controller never reads the
//!   environment mid-run
//! - Connection timeouts are fixed defaults, not configurable knobs
//! - Only values that cannot be interpreted at all are rejected here; address
//!   validity is left to the bind step

pub mod env;
pub mod schema;

pub use env::ConfigError;
pub use schema::ServerConfig;
