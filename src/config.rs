//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL_MS: u64 = 300_000;

// == Expiry Policy ==
/// Decides what happens to an entry's deadline when its value is overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Overwriting keeps the deadline set when the entry was created.
    ///
    /// An entry that has already expired stays expired after an overwrite,
    /// so the next `get` still reports it absent.
    #[default]
    KeepDeadline,
    /// Overwriting restarts the entry's TTL from the current time.
    RefreshOnWrite,
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep_deadline" => Ok(ExpiryPolicy::KeepDeadline),
            "refresh" | "refresh_on_write" => Ok(ExpiryPolicy::RefreshOnWrite),
            other => Err(format!("unknown expiry policy: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in milliseconds applied to every new entry
    pub ttl_ms: u64,
    /// Deadline handling on overwrite
    pub expiry_policy: ExpiryPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `CACHE_EXPIRY_POLICY` - `keep` or `refresh` (default: keep)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            capacity: lookup("CACHE_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            ttl_ms: lookup("CACHE_TTL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            expiry_policy: lookup("CACHE_EXPIRY_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Returns the configured TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl_ms: DEFAULT_TTL_MS,
            expiry_policy: ExpiryPolicy::KeepDeadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.ttl_ms, 300_000);
        assert_eq!(config.expiry_policy, ExpiryPolicy::KeepDeadline);
        assert_eq!(config.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_config_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_CAPACITY", "16"),
            ("CACHE_TTL_MS", "250"),
            ("CACHE_EXPIRY_POLICY", "refresh"),
        ]));
        assert_eq!(config.capacity, 16);
        assert_eq!(config.ttl(), Duration::from_millis(250));
        assert_eq!(config.expiry_policy, ExpiryPolicy::RefreshOnWrite);
    }

    #[test]
    fn test_config_lookup_bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_CAPACITY", "lots"),
            ("CACHE_TTL_MS", "-5"),
            ("CACHE_EXPIRY_POLICY", "sometimes"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_expiry_policy_parse() {
        assert_eq!("keep".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::KeepDeadline));
        assert_eq!(" Refresh_On_Write ".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::RefreshOnWrite));
        assert!("never".parse::<ExpiryPolicy>().is_err());
    }

    #[test]
    fn test_config_deserialize_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"capacity": 8, "expiry_policy": "refresh_on_write"}"#)
                .unwrap();
        assert_eq!(config.capacity, 8);
        assert_eq!(config.ttl_ms, 300_000);
        assert_eq!(config.expiry_policy, ExpiryPolicy::RefreshOnWrite);
    }
}
