//! Single-slot rebuild request.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Pending-rebuild flag shared by the watcher and the rebuild loop.
///
/// Requests made while a rebuild runs collapse into one follow-up rebuild:
/// [`Notify`] stores at most one permit.
#[derive(Default)]
pub struct RebuildSlot {
    notify: Notify,
    closed: AtomicBool,
}

impl RebuildSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.notify.notify_one();
    }

    /// Stop the rebuild loop after its current rebuild.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Wait for a request. Returns `false` once closed.
    pub async fn next(&self) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        self.notify.notified().await;
        !self.closed.load(Ordering::SeqCst)
    }
}
