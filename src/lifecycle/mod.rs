//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (controller.rs):
//!     Config + handler → spawn serve task → bind → accept loop
//!     Bind outcome → startup channel → foreground
//!
//! Shutdown (controller.rs + signals.rs):
//!     Interrupt received → stop accepting → drain until deadline → exit
//! ```
//!
//! # Design Decisions
//! - Exactly one listener per controller; the handle's state machine only
//!   moves forward (Created → Running → Draining → Stopped)
//! - Startup failure is reported, logged and non-fatal; the interrupt wait
//!   continues so the operator owns the process's end
//! - Shutdown has a deadline: connections open when it elapses are aborted

pub mod controller;
pub mod signals;

pub use controller::{LifecycleController, ServerHandle, ServerState};
