//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for the interrupt signal (SIGINT / ctrl-c)
//! - Announce shutdown on stdout, matching the startup banner
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Resolving the returned future triggers axum's graceful shutdown;
//!   the process then exits 0 through main

/// Wait for ctrl-c, then announce shutdown.
///
/// If the signal handler cannot be installed the future resolves
/// immediately, which shuts the server down rather than leaving it
/// uninterruptible.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        return;
    }
    println!("\nKeyboard interrupt received, exiting.");
    tracing::info!("Shutdown signal received");
}
