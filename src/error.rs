//! Error types for portsniff.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanning operations.
///
/// `InvalidAddress` and `NoTargets` are returned before any probe is
/// dispatched. `ProbeFailed` is never returned on its own; it is collected
/// per target into [`ScanReport::errors`](crate::scanner::ScanReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("no ports to scan provided")]
    NoTargets,

    #[error("while scanning {target}: {reason}")]
    ProbeFailed { target: SocketAddr, reason: String },
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading scanner options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid options format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
