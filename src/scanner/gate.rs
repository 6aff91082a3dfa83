//! Concurrency gate for in-flight probes.
//!
//! A counting semaphore with owned permits. Dropping a [`GatePermit`] is the
//! release, so a probe task gives its slot back on every exit path,
//! including a panic. [`Gate::await_idle`] is the completion barrier: it
//! resolves once every permit is back.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded admission control shared by every probe of one scanner.
///
/// Cloning is cheap and yields a handle to the same gate.
#[derive(Debug, Clone)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
    capacity: u32,
}

/// One admission slot. Released on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    /// Give the slot back to the gate.
    pub fn release(self) {}
}

impl Gate {
    /// Create a gate admitting at most `capacity` holders at once.
    ///
    /// The capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity
            .clamp(1, u32::MAX as usize)
            .min(Semaphore::MAX_PERMITS) as u32;

        Self {
            semaphore: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
        }
    }

    /// Maximum number of simultaneous holders.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Number of slots currently held. While a barrier is pending, slots it
    /// has already reserved are counted too.
    pub fn in_flight(&self) -> usize {
        self.capacity() - self.semaphore.available_permits()
    }

    /// Wait for a free slot and take it.
    ///
    /// Waiters are admitted in FIFO order.
    pub async fn acquire(&self) -> GatePermit {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("gate semaphore is never closed");

        GatePermit { _permit: permit }
    }

    /// Wait until every slot has been released.
    ///
    /// Holders admitted by other scans on the same gate are waited for too.
    /// Acquisitions queued after this call wait until the barrier has passed.
    pub async fn await_idle(&self) {
        // Taking every permit at once can only succeed when nobody holds one.
        if let Ok(all) = self.semaphore.acquire_many(self.capacity).await {
            drop(all);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, block_on, task};

    #[test]
    fn test_capacity_is_at_least_one() {
        assert_eq!(Gate::new(0).capacity(), 1);
        assert_eq!(Gate::new(50).capacity(), 50);
    }

    #[test]
    fn test_in_flight_tracks_permits() {
        let gate = Gate::new(3);
        let a = block_on(gate.acquire());
        let b = block_on(gate.acquire());
        assert_eq!(gate.in_flight(), 2);

        a.release();
        assert_eq!(gate.in_flight(), 1);
        drop(b);
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_acquire_blocks_at_capacity() {
        let gate = Gate::new(1);
        let held = block_on(gate.acquire());

        let mut next = task::spawn(gate.acquire());
        assert_pending!(next.poll());

        drop(held);
        assert!(next.is_woken());
        let _permit = assert_ready!(next.poll());
        assert_eq!(gate.in_flight(), 1);
    }

    #[test]
    fn test_await_idle_waits_for_release() {
        let gate = Gate::new(4);
        let first = block_on(gate.acquire());
        let second = block_on(gate.acquire());

        let mut idle = task::spawn(gate.await_idle());
        assert_pending!(idle.poll());

        drop(first);
        assert_pending!(idle.poll());

        drop(second);
        assert!(idle.is_woken());
        assert_ready!(idle.poll());
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_await_idle_on_idle_gate_is_immediate() {
        let gate = Gate::new(2);
        let mut idle = task::spawn(gate.await_idle());
        assert_ready!(idle.poll());
    }

    #[tokio::test]
    async fn test_permit_released_when_task_panics() {
        let gate = Gate::new(1);
        let permit = gate.acquire().await;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            panic!("probe blew up");
        });
        assert!(handle.await.is_err());

        tokio::time::timeout(Duration::from_secs(1), gate.await_idle())
            .await
            .unwrap();
        assert_eq!(gate.in_flight(), 0);
    }
}
