use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Coalesces rapid triggers: only the last trigger within the idle window
/// settles.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Register a trigger and wait out the window. Returns `false` if a newer
    /// trigger (or [`cancel_pending`](Self::cancel_pending)) arrived meanwhile.
    pub async fn settle(&self) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.generation.load(Ordering::SeqCst) == mine
    }

    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
