//! Controller configuration from environment variables.

use crate::error::ControllerError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Requeue interval after a successful reconcile
    pub poll_interval: Duration,
    /// Concurrent reconciles per kind
    pub concurrency: u16,
    /// Quiet period before a changed object is reconciled
    pub debounce: Duration,
    /// First error backoff
    pub backoff_min: Duration,
    /// Error backoff cap
    pub backoff_max: Duration,
    /// Listener for probes and metrics
    pub metrics_addr: SocketAddr,
    /// Google API root override, e.g. a local emulator
    pub api_root: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            concurrency: 3,
            debounce: Duration::from_secs(5),
            backoff_min: Duration::from_secs(5),
            backoff_max: Duration::from_secs(300),
            metrics_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_root: None,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| -> Result<Duration, ControllerError> {
            parse(&lookup, key)?.map_or(Ok(default), |s: u64| Ok(Duration::from_secs(s)))
        };

        let config = Self {
            poll_interval: secs("POLL_INTERVAL_SECS", defaults.poll_interval)?,
            concurrency: parse(&lookup, "RECONCILE_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            debounce: secs("RECONCILE_DEBOUNCE_SECS", defaults.debounce)?,
            backoff_min: secs("BACKOFF_MIN_SECS", defaults.backoff_min)?,
            backoff_max: secs("BACKOFF_MAX_SECS", defaults.backoff_max)?,
            metrics_addr: parse(&lookup, "METRICS_ADDR")?.unwrap_or(defaults.metrics_addr),
            api_root: lookup("GCP_API_ROOT").filter(|v| !v.is_empty()),
        };

        if config.backoff_min.is_zero() || config.backoff_min > config.backoff_max {
            return Err(ControllerError::InvalidConfig(format!(
                "BACKOFF_MIN_SECS ({}) must be positive and not exceed BACKOFF_MAX_SECS ({})",
                config.backoff_min.as_secs(),
                config.backoff_max.as_secs()
            )));
        }
        if config.concurrency == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ControllerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ControllerError::InvalidConfig(format!("{key}={raw:?} is not valid: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.metrics_addr.port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("POLL_INTERVAL_SECS", "30"),
            ("RECONCILE_CONCURRENCY", "8"),
            ("METRICS_ADDR", "127.0.0.1:9090"),
            ("GCP_API_ROOT", "http://localhost:8085"),
        ]))
        .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.metrics_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.api_root.as_deref(), Some("http://localhost:8085"));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup(&[("POLL_INTERVAL_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidConfig(m) if m.contains("POLL_INTERVAL_SECS")));
    }

    #[test]
    fn test_backoff_bounds_are_checked() {
        let err = Config::from_lookup(lookup(&[("BACKOFF_MIN_SECS", "600")])).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidConfig(_)));
    }
}
