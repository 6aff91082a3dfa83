//! Scanner options and where to find them.
//!
//! Options are a typed record. When they come from untyped JSON, every key is
//! resolved on its own: a missing key takes its default, and a key with a
//! value of the wrong shape takes its default and logs a warning. Loading
//! never fails because of a single bad value.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default per-probe connect timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 500;
/// Default maximum number of probes in flight.
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;
/// Default pause before each dispatch in milliseconds.
pub const DEFAULT_DISPATCH_DELAY_MS: u64 = 50;
/// Default scanner-wide rate limit (0 = unlimited).
pub const DEFAULT_RATE_LIMIT: u32 = 0;

/// Name of the options file inside the config directory.
const OPTIONS_FILE: &str = "options.json";

/// Configuration for a [`Scanner`](crate::scanner::Scanner).
///
/// Immutable once the scanner is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Connect timeout for each probe, in milliseconds. 0 means no deadline:
    /// a probe then waits as long as the OS connect does.
    pub timeout_ms: u64,
    /// Maximum number of probes in flight at once. Always at least 1.
    pub max_concurrency: usize,
    /// Pause before each probe dispatch, in milliseconds.
    pub dispatch_delay_ms: u64,
    /// Probes per second across all scans of one scanner, 0 for unlimited.
    pub rate_limit: u32,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dispatch_delay_ms: DEFAULT_DISPATCH_DELAY_MS,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ScannerOptions {
    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_ms(timeout);
        self
    }

    /// Set the concurrency limit. Zero falls back to the default.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = if max_concurrency == 0 {
            warn!(
                "max_concurrency must be at least 1, using default: {}",
                DEFAULT_MAX_CONCURRENCY
            );
            DEFAULT_MAX_CONCURRENCY
        } else {
            max_concurrency
        };
        self
    }

    /// Set the pause before each dispatch.
    pub fn with_dispatch_delay(mut self, delay: Duration) -> Self {
        self.dispatch_delay_ms = duration_to_ms(delay);
        self
    }

    /// Set the scanner-wide rate limit in probes per second.
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    /// Parse options from a JSON document.
    ///
    /// The document must be a JSON object; anything inside it is resolved
    /// leniently.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load options from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_json_str(&content)
    }

    /// Load options from the default location, or defaults if there is no
    /// options file.
    pub fn load() -> ConfigResult<Self> {
        Self::load_or_default(&default_options_path()?)
    }

    /// Load options from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(path)
    }
}

/// Path of the options file in the XDG config directory
/// (`~/.config/portsniff/options.json` on Linux).
pub fn default_options_path() -> ConfigResult<PathBuf> {
    let project =
        ProjectDirs::from("com", "portsniff", "portsniff").ok_or(ConfigError::DirectoryNotFound)?;
    Ok(project.config_dir().join(OPTIONS_FILE))
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Canonical option keys and the legacy names accepted for them.
const TIMEOUT_KEYS: (&str, &str) = ("timeout_ms", "timeout");
const MAX_CONCURRENCY_KEYS: (&str, &str) = ("max_concurrency", "maxConc");
const DISPATCH_DELAY_KEYS: (&str, &str) = ("dispatch_delay_ms", "delay");
const RATE_LIMIT_KEY: &str = "rate_limit";

impl<'de> Deserialize<'de> for ScannerOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = Map::<String, Value>::deserialize(deserializer)?;

        let timeout = take_option(&mut raw, TIMEOUT_KEYS);
        let max_concurrency = take_option(&mut raw, MAX_CONCURRENCY_KEYS);
        let dispatch_delay = take_option(&mut raw, DISPATCH_DELAY_KEYS);
        let rate_limit = raw.remove(RATE_LIMIT_KEY);

        for key in raw.keys() {
            warn!("Unrecognized option '{}', ignoring", key);
        }

        let mut max_concurrency =
            resolve(MAX_CONCURRENCY_KEYS.0, max_concurrency, DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            warn!(
                "Option 'max_concurrency' must be at least 1, using default: {}",
                DEFAULT_MAX_CONCURRENCY
            );
            max_concurrency = DEFAULT_MAX_CONCURRENCY;
        }

        Ok(Self {
            timeout_ms: resolve(TIMEOUT_KEYS.0, timeout, DEFAULT_TIMEOUT_MS),
            max_concurrency,
            dispatch_delay_ms: resolve(
                DISPATCH_DELAY_KEYS.0,
                dispatch_delay,
                DEFAULT_DISPATCH_DELAY_MS,
            ),
            rate_limit: resolve(RATE_LIMIT_KEY, rate_limit, DEFAULT_RATE_LIMIT),
        })
    }
}

/// Remove an option and its legacy alias from the document. The canonical
/// key wins when both are present.
fn take_option(raw: &mut Map<String, Value>, (key, legacy): (&str, &str)) -> Option<Value> {
    match (raw.remove(key), raw.remove(legacy)) {
        (Some(value), Some(_)) => {
            warn!(
                "Options '{}' and '{}' are both set, using '{}'",
                key, legacy, key
            );
            Some(value)
        }
        (value, legacy_value) => value.or(legacy_value),
    }
}

/// Resolve one option value, falling back to `default` when it is missing or
/// has the wrong type.
fn resolve<T>(key: &str, value: Option<Value>, default: T) -> T
where
    T: DeserializeOwned + std::fmt::Debug,
{
    match value {
        None | Some(Value::Null) => default,
        Some(value) => match T::deserialize(&value) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "Option '{}' has invalid type ({}), using default: {:?}",
                    key, value, default
                );
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_options() {
        let options = ScannerOptions::default();
        assert_eq!(options.timeout(), Duration::from_millis(500));
        assert_eq!(options.max_concurrency, 50);
        assert_eq!(options.dispatch_delay(), Duration::from_millis(50));
        assert_eq!(options.rate_limit, 0);
    }

    #[test]
    fn test_builder() {
        let options = ScannerOptions::default()
            .with_timeout(Duration::from_secs(2))
            .with_max_concurrency(8)
            .with_dispatch_delay(Duration::ZERO)
            .with_rate_limit(100);
        assert_eq!(options.timeout_ms, 2000);
        assert_eq!(options.max_concurrency, 8);
        assert_eq!(options.dispatch_delay_ms, 0);
        assert_eq!(options.rate_limit, 100);
    }

    #[test]
    fn test_zero_concurrency_uses_default() {
        let options = ScannerOptions::default().with_max_concurrency(0);
        assert_eq!(options.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let options = ScannerOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ScannerOptions::default());
    }

    #[test]
    fn test_partial_object_fills_defaults() {
        let options = ScannerOptions::from_json_str(r#"{"timeout_ms": 1500}"#).unwrap();
        assert_eq!(options.timeout_ms, 1500);
        assert_eq!(options.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(options.dispatch_delay_ms, DEFAULT_DISPATCH_DELAY_MS);
    }

    #[test]
    fn test_wrong_types_fall_back_per_key() {
        let options = ScannerOptions::from_json_str(
            r#"{"timeout_ms": "fast", "max_concurrency": 10, "dispatch_delay_ms": -5, "rate_limit": [1]}"#,
        )
        .unwrap();
        assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(options.max_concurrency, 10);
        assert_eq!(options.dispatch_delay_ms, DEFAULT_DISPATCH_DELAY_MS);
        assert_eq!(options.rate_limit, DEFAULT_RATE_LIMIT);
    }

    #[test]
    fn test_legacy_key_names() {
        let options =
            ScannerOptions::from_json_str(r#"{"timeout": 250, "maxConc": 5, "delay": 0}"#)
                .unwrap();
        assert_eq!(options.timeout_ms, 250);
        assert_eq!(options.max_concurrency, 5);
        assert_eq!(options.dispatch_delay_ms, 0);
    }

    #[test]
    fn test_unknown_keys_and_nulls_are_ignored() {
        let options =
            ScannerOptions::from_json_str(r#"{"retries": 3, "timeout_ms": null}"#).unwrap();
        assert_eq!(options, ScannerOptions::default());
    }

    #[test]
    fn test_zero_concurrency_in_json_uses_default() {
        let options = ScannerOptions::from_json_str(r#"{"max_concurrency": 0}"#).unwrap();
        assert_eq!(options.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(matches!(
            ScannerOptions::from_json_str("[1, 2, 3]"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_concurrency": 3, "dispatch_delay_ms": 10}}"#).unwrap();

        let options = ScannerOptions::load_from(file.path()).unwrap();
        assert_eq!(options.max_concurrency, 3);
        assert_eq!(options.dispatch_delay_ms, 10);
        assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_canonical_key_wins_over_legacy_key() {
        let options = ScannerOptions::from_json_str(
            r#"{"timeout": 250, "timeout_ms": 300, "maxConc": 4, "max_concurrency": 6}"#,
        )
        .unwrap();
        assert_eq!(options.timeout_ms, 300);
        assert_eq!(options.max_concurrency, 6);
        assert_eq!(options.dispatch_delay_ms, DEFAULT_DISPATCH_DELAY_MS);
    }

    #[test]
    fn test_bad_canonical_value_does_not_fall_back_to_legacy() {
        let options =
            ScannerOptions::from_json_str(r#"{"delay": 5, "dispatch_delay_ms": "soon"}"#)
                .unwrap();
        assert_eq!(options.dispatch_delay_ms, DEFAULT_DISPATCH_DELAY_MS);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = ScannerOptions::load_or_default(&dir.path().join(OPTIONS_FILE)).unwrap();
        assert_eq!(options, ScannerOptions::default());
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OPTIONS_FILE);
        fs::write(&path, r#"{"rate_limit": 25}"#).unwrap();

        let options = ScannerOptions::load_or_default(&path).unwrap();
        assert_eq!(options.rate_limit, 25);
        assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_load_uses_xdg_config_home() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let path = default_options_path().unwrap();
        assert_eq!(path, dir.path().join("portsniff").join(OPTIONS_FILE));
        assert_eq!(ScannerOptions::load().unwrap(), ScannerOptions::default());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"max_concurrency": 7}"#).unwrap();
        assert_eq!(ScannerOptions::load().unwrap().max_concurrency, 7);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScannerOptions::load_from(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }
}
