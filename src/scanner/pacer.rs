//! Dispatch pacing.
//!
//! The pacer spaces out probe dispatches within one scan, not completions,
//! so a scan never bursts new connections faster than one per delay even
//! when the gate has room.

use std::time::Duration;
use tokio::time::sleep;

/// Fixed pause taken before every dispatch of a scan.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Suspend the dispatching task for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
