//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept loop)
//!     → idle.rs (inactivity watchdog per connection)
//!     → connection.rs (per-connection identity for tracing)
//!     → Hand off to HTTP serving in the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - Every accepted connection is wrapped in the idle watchdog so slow or
//!   silent peers cannot hold sockets open indefinitely
//! - Accept errors are reported to the caller, which decides whether they
//!   are fatal

pub mod connection;
pub mod idle;
pub mod listener;

pub use connection::ConnectionId;
pub use idle::IdleTimeout;
pub use listener::{Listener, ListenerError};
