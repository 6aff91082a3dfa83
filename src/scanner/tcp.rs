//! TCP connect probe.
//!
//! Completes a full TCP handshake using the operating system's socket API
//! and closes the connection straight away.

use crate::scanner::traits::{Probe, ProbeOutcome};
use crate::types::Target;
use async_trait::async_trait;
use std::io;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect probe with a fixed per-attempt timeout.
///
/// A zero timeout means no deadline of our own; the attempt lasts as long
/// as the OS connect does. Does not require elevated privileges.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP connect probe.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, target: Target) -> ProbeOutcome {
        let start = Instant::now();

        let connect = TcpStream::connect(target.socket_addr());
        let result = if self.timeout.is_zero() {
            Ok(connect.await)
        } else {
            timeout(self.timeout, connect).await
        };

        let outcome = match result {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeOutcome::Open
            }
            Ok(Err(e)) => classify_connect_error(&e),
            Err(_) => ProbeOutcome::TimedOut,
        };

        trace!(
            %target,
            %outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "probe finished"
        );
        outcome
    }
}

/// Map a connect error onto a probe outcome.
///
/// Refusals and resets mean nothing is listening. A timeout reported by the
/// OS is the same as our own timer elapsing. Everything else is an
/// operational failure worth reporting.
pub fn classify_connect_error(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => ProbeOutcome::Closed,
        io::ErrorKind::TimedOut => ProbeOutcome::TimedOut,
        _ => ProbeOutcome::Failed(err.to_string()),
    }
}
