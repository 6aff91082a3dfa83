//! Scanner module - the connect scan engine.
//!
//! A [`Scanner`] owns its options, one concurrency [`Gate`], and an optional
//! scanner-wide [`RateLimiter`]. Each scan call validates its input, pushes
//! probes through the [`Dispatcher`], waits on the gate barrier, and then
//! aggregates the outcomes into a [`ScanReport`].
//!
//! Concurrent scan calls on the same scanner share its gate, so together
//! they never exceed `max_concurrency` probes in flight. Pacing is per call.

pub mod aggregate;
pub mod dispatch;
pub mod gate;
pub mod pacer;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

use crate::config::ScannerOptions;
use crate::error::{ScanError, ScanResult};
use crate::types::{parse_host, PortRange, Target};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub use aggregate::{aggregate, ErrorPolicy, ScanReport};
pub use dispatch::{Dispatcher, PendingSlot};
pub use gate::{Gate, GatePermit};
pub use pacer::Pacer;
pub use rate_limiter::RateLimiter;
pub use tcp::{classify_connect_error, TcpProbe};
pub use traits::{Probe, ProbeOutcome};

/// TCP connect scanner.
///
/// # Example
///
/// ```rust,ignore
/// use portsniff::{Scanner, ScannerOptions};
///
/// let scanner = Scanner::new(ScannerOptions::default());
/// let report = scanner.scan_range("192.168.1.1", 1, 1000).await?;
/// for port in &report.open_ports {
///     println!("{} is open", port);
/// }
/// for err in &report.errors {
///     eprintln!("{}", err);
/// }
/// ```
#[derive(Debug)]
pub struct Scanner<P: Probe = TcpProbe> {
    options: ScannerOptions,
    probe: Arc<P>,
    gate: Gate,
    rate_limiter: Option<RateLimiter>,
}

impl Scanner<TcpProbe> {
    /// Create a scanner that probes with real TCP connects.
    pub fn new(options: ScannerOptions) -> Self {
        let probe = TcpProbe::new(options.timeout());
        Self::with_probe(options, probe)
    }
}

impl Default for Scanner<TcpProbe> {
    fn default() -> Self {
        Self::new(ScannerOptions::default())
    }
}

impl<P: Probe> Scanner<P> {
    /// Create a scanner around a custom probe.
    pub fn with_probe(options: ScannerOptions, probe: P) -> Self {
        let gate = Gate::new(options.max_concurrency);
        let rate_limiter = RateLimiter::new(options.rate_limit);

        Self {
            options,
            probe: Arc::new(probe),
            gate,
            rate_limiter,
        }
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Number of probes currently in flight across all calls.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Probe a single port.
    ///
    /// Bypasses pacing but still takes a gate slot.
    pub async fn scan_single(&self, host: &str, port: u16) -> ScanResult<ScanReport> {
        let ip = parse_host(host)?;
        Ok(self.probe_one(Target::new(ip, port)).await)
    }

    /// Probe every port in `[start, end]`, both ends included.
    ///
    /// Reversed bounds are swapped rather than rejected. A one-port range is
    /// handed to [`scan_single`](Self::scan_single). Every failure is
    /// collected.
    pub async fn scan_range(&self, host: &str, start: u16, end: u16) -> ScanResult<ScanReport> {
        let ip = parse_host(host)?;

        let (range, swapped) = PortRange::ordered(start, end);
        if range.is_single() {
            info!(%ip, port = start, "scanning a range of size 1");
            return Ok(self.probe_one(Target::new(ip, start)).await);
        }
        if swapped {
            warn!(
                start,
                end,
                "range start is after range end, scanning {}-{} instead",
                range.start(),
                range.end()
            );
        }

        let targets = range.iter().map(|port| Target::new(ip, port));
        Ok(self
            .run_batch(ip, range.len(), targets, ErrorPolicy::CollectAll)
            .await)
    }

    /// Probe a given list of ports, in the order given.
    ///
    /// Duplicates are probed again but reported once. The first failed
    /// target, in list order, ends aggregation: its error is reported and
    /// outcomes of the targets after it are discarded.
    pub async fn scan_array(&self, host: &str, ports: &[u16]) -> ScanResult<ScanReport> {
        let ip = parse_host(host)?;
        if ports.is_empty() {
            return Err(ScanError::NoTargets);
        }

        let targets = ports.iter().map(|&port| Target::new(ip, port));
        Ok(self
            .run_batch(ip, ports.len(), targets, ErrorPolicy::StopAtFirst)
            .await)
    }

    async fn probe_one(&self, target: Target) -> ScanReport {
        let permit = self.gate.acquire().await;
        let outcome = self.probe.probe(target).await;
        permit.release();

        let mut report = ScanReport::default();
        match outcome {
            ProbeOutcome::Open => report.open_ports.push(target.port),
            ProbeOutcome::Closed | ProbeOutcome::TimedOut => {}
            ProbeOutcome::Failed(reason) => report.errors.push(ScanError::ProbeFailed {
                target: target.socket_addr(),
                reason,
            }),
        }
        report
    }

    async fn run_batch<I>(
        &self,
        ip: IpAddr,
        count: usize,
        targets: I,
        policy: ErrorPolicy,
    ) -> ScanReport
    where
        I: IntoIterator<Item = Target>,
    {
        let start = Instant::now();
        let dispatcher = Dispatcher::new(
            &self.probe,
            &self.gate,
            Pacer::new(self.options.dispatch_delay()),
            self.rate_limiter.as_ref(),
        );

        let slots = dispatcher.run(targets).await;
        let report = aggregate(slots, policy).await;

        debug!(
            %ip,
            ports = count,
            open = report.open_ports.len(),
            errors = report.errors.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        report
    }
}
