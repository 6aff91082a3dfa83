//! Outcome aggregation.
//!
//! Reads every pending slot once, after the gate barrier, and splits the
//! outcomes into open ports and errors. Closed and timed-out targets are
//! dropped silently.

use crate::error::ScanError;
use crate::scanner::dispatch::PendingSlot;
use crate::scanner::traits::ProbeOutcome;
use std::collections::BTreeSet;

/// What to do when a slot holds a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Record every failure and keep reading.
    CollectAll,
    /// Record the first failure and stop; later slots are discarded.
    StopAtFirst,
}

/// Outcome of one scan call.
///
/// Always inspect both fields: an empty `open_ports` with errors means the
/// probes ran but failed, which is not the same as every port being closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Ports that accepted a connection, ascending and without duplicates.
    pub open_ports: Vec<u16>,
    /// One [`ScanError::ProbeFailed`] per failed target, in dispatch order.
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    /// True when no probe failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check whether `port` was found open.
    pub fn is_open(&self, port: u16) -> bool {
        self.open_ports.binary_search(&port).is_ok()
    }
}

/// Fold pending slots into a report, reading them in dispatch order.
pub async fn aggregate(slots: Vec<PendingSlot>, policy: ErrorPolicy) -> ScanReport {
    let mut open = BTreeSet::new();
    let mut errors = Vec::new();

    for slot in slots {
        let (target, outcome) = slot.resolve().await;
        match outcome {
            ProbeOutcome::Open => {
                open.insert(target.port);
            }
            ProbeOutcome::Closed | ProbeOutcome::TimedOut => {}
            ProbeOutcome::Failed(reason) => {
                errors.push(ScanError::ProbeFailed {
                    target: target.socket_addr(),
                    reason,
                });
                if policy == ErrorPolicy::StopAtFirst {
                    break;
                }
            }
        }
    }

    ScanReport {
        open_ports: open.into_iter().collect(),
        errors,
    }
}
