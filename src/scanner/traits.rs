//! Probe trait abstraction.
//!
//! Defines the seam between the dispatch machinery and the thing that
//! actually touches the network, enabling polymorphism and easier testing.

use crate::types::Target;
use async_trait::async_trait;
use std::fmt;

/// Classification of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The connection was accepted.
    Open,
    /// The connection was refused or reset.
    Closed,
    /// No answer within the timeout. Reported like `Closed`.
    TimedOut,
    /// Any other dial failure, with its reason.
    Failed(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Trait for single-target probe implementations.
///
/// A probe must always return an outcome; it never holds the concurrency
/// gate itself; the dispatcher acquires and releases around it.
///
/// # Example
///
/// ```ignore
/// use portsniff::scanner::{Probe, ProbeOutcome};
/// use portsniff::types::Target;
///
/// async fn is_open<P: Probe>(probe: &P, target: Target) -> bool {
///     probe.probe(target).await == ProbeOutcome::Open
/// }
/// ```
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Probe a single target.
    async fn probe(&self, target: Target) -> ProbeOutcome;
}
