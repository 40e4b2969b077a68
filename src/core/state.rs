//! Global runtime state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `GRACEFUL`: Does a long-running loop (watch mode) poll `SHUTDOWN`?

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

static GRACEFUL: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - `graceful = false`: exit immediately (one-shot commands)
/// - `graceful = true`: set the shutdown flag; the watch loop exits after the
///   current rebuild
pub fn setup_shutdown_handler(graceful: bool) -> anyhow::Result<()> {
    GRACEFUL.store(graceful, Ordering::SeqCst);

    ctrlc::set_handler(|| {
        if !GRACEFUL.load(Ordering::SeqCst) {
            std::process::exit(130);
        }
        if !SHUTDOWN.swap(true, Ordering::SeqCst) {
            crate::log!("watch"; "shutting down...");
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering: worst case is one more poll before stopping
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
