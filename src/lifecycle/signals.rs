//! OS signal handling.
//!
//! # Responsibilities
//! - Register the interrupt handler (Ctrl+C / SIGINT)
//! - Turn the signal into a future the controller can await
//!
//! # Design Decisions
//! - Interrupt is the only registered signal; terminate, quit and kill all
//!   bypass graceful shutdown and fall through to default process handling
//! - Uses Tokio's signal handling (async-safe)

/// Wait for a single interrupt.
pub async fn interrupt() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install interrupt handler");
    tracing::info!("interrupt received");
}
