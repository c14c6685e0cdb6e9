//! HTTP layer subsystem.
//!
//! # Data Flow
//! ```text
//! router.rs builds the Axum router
//!     → CORS policy, request timeout, trace middleware
//!     → handed to the lifecycle controller as the request handler
//! ```
//!
//! # Design Decisions
//! - The lifecycle controller never inspects the handler; anything that can
//!   turn a request into a response can be served
//! - The cross-origin policy lives here, as a wrapping layer, not in the
//!   controller

pub mod router;

pub use router::{build_router, cors_layer, with_layers};
