//! # portsniff - A TCP Connect Scan Engine
//!
//! portsniff finds which ports on a host accept a TCP connection within a
//! timeout, while bounding how many connection attempts run at once and
//! pacing how fast new attempts are issued.
//!
//! ## Features
//!
//! - **Three scan modes**: single port, inclusive range, and arbitrary list
//! - **Bounded concurrency**: one semaphore gate per scanner, shared by every call
//! - **Dispatch pacing**: a fixed delay before each new connection attempt
//! - **Failure classification**: timeouts and refusals are normal outcomes;
//!   other dial failures are reported next to the open ports found
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsniff::{Scanner, ScannerOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsniff::ScanError> {
//!     let options = ScannerOptions::default()
//!         .with_timeout(Duration::from_millis(300))
//!         .with_max_concurrency(100);
//!     let scanner = Scanner::new(options);
//!
//!     let report = scanner.scan_range("192.168.1.1", 1, 1024).await?;
//!     println!("open: {:?}", report.open_ports);
//!     for err in &report.errors {
//!         eprintln!("{}", err);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Targets, host parsing, and port ranges
//! - [`scanner`] - The gate, pacer, probe, dispatcher, aggregator, and facade
//! - [`config`] - Typed scanner options and lenient loading
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::ScannerOptions;
pub use error::{ConfigError, ScanError, ScanResult};
pub use scanner::{Probe, ProbeOutcome, ScanReport, Scanner, TcpProbe};
pub use types::{PortRange, Target};
