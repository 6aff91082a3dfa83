//! Probe dispatch.
//!
//! Issues one probe task per target in the order given. Before each
//! dispatch the pacer (and the optional rate limiter) is waited out and a
//! gate slot is taken; the slot moves into the probe task and is released
//! when that task ends. After the last dispatch the gate's idle barrier is
//! the only synchronisation before results are read.

use crate::scanner::gate::Gate;
use crate::scanner::pacer::Pacer;
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::traits::{Probe, ProbeOutcome};
use crate::types::Target;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Result slot for one dispatched target.
///
/// Written only by its probe task and read once after the barrier.
#[derive(Debug)]
pub struct PendingSlot {
    target: Target,
    handle: JoinHandle<ProbeOutcome>,
}

impl PendingSlot {
    /// Read the outcome. A probe task that died without producing one is a
    /// failure for its target.
    pub async fn resolve(self) -> (Target, ProbeOutcome) {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(addr = %self.target, "probe task aborted: {}", e);
                ProbeOutcome::Failed(format!("probe task aborted: {}", e))
            }
        };
        (self.target, outcome)
    }
}

/// Runs one batch of probes under a scanner's gate.
pub struct Dispatcher<'a, P: Probe> {
    probe: &'a Arc<P>,
    gate: &'a Gate,
    pacer: Pacer,
    rate_limiter: Option<&'a RateLimiter>,
}

impl<'a, P: Probe> Dispatcher<'a, P> {
    pub fn new(
        probe: &'a Arc<P>,
        gate: &'a Gate,
        pacer: Pacer,
        rate_limiter: Option<&'a RateLimiter>,
    ) -> Self {
        Self {
            probe,
            gate,
            pacer,
            rate_limiter,
        }
    }

    /// Dispatch every target and wait for all of them to finish.
    ///
    /// Slots come back in dispatch order. An empty batch returns at once
    /// without touching the pacer or the gate.
    pub async fn run<I>(&self, targets: I) -> Vec<PendingSlot>
    where
        I: IntoIterator<Item = Target>,
    {
        let targets = targets.into_iter();
        let mut slots = Vec::with_capacity(targets.size_hint().0);

        for target in targets {
            slots.push(self.dispatch(target).await);
        }

        if !slots.is_empty() {
            self.gate.await_idle().await;
        }
        slots
    }

    async fn dispatch(&self, target: Target) -> PendingSlot {
        self.pacer.wait().await;
        if let Some(limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let permit = self.gate.acquire().await;
        let probe = Arc::clone(self.probe);
        trace!(%target, in_flight = self.gate.in_flight(), "dispatching probe");

        let handle = tokio::spawn(async move {
            let _permit = permit;
            probe.probe(target).await
        });

        PendingSlot { target, handle }
    }
}
