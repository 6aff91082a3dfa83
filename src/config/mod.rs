//! Configuration management for portsniff.
//!
//! Provides the typed scanner options record and XDG-compliant loading.

mod settings;

pub use settings::{
    default_options_path, ScannerOptions, DEFAULT_DISPATCH_DELAY_MS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_RATE_LIMIT, DEFAULT_TIMEOUT_MS,
};
