//! Router construction and middleware layers.
//!
//! # Responsibilities
//! - Build the Axum router handed to the lifecycle controller
//! - Wire up middleware (cross-origin policy, request timeout, tracing)
//!
//! # Design Decisions
//! - The service mounts no business routes; the router exists to carry the
//!   middleware stack and answer 404 for everything else
//! - The cross-origin policy allows any origin without credentials and
//!   restricts browser methods to GET, POST and OPTIONS

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Permissive cross-origin policy: any origin, no credentials, methods
/// restricted to GET, POST and OPTIONS.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

/// Apply the service middleware stack to a router.
///
/// The request timeout uses the configured write timeout: it bounds handler
/// execution and response generation the way the listener's read timeout
/// bounds the request head.
pub fn with_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(config.write_timeout))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Build the service router: no business routes, middleware only.
pub fn build_router(config: &ServerConfig) -> Router {
    with_layers(Router::new(), config)
}
