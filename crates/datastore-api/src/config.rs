//! Service configuration read from the environment
use std::path::PathBuf;
use std::time::Duration;

use datastore_validation::DEFAULT_MIN_TIMESPAN_DAYS;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// JSON file listing data-set metadata; `None` serves an empty directory
    pub data_sets_path: Option<PathBuf>,
    pub lookup_timeout: Duration,
    pub min_timespan_days: u32,
    pub max_gzip_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_sets_path: None,
            lookup_timeout: Duration::from_millis(5000),
            min_timespan_days: DEFAULT_MIN_TIMESPAN_DAYS,
            max_gzip_size: 10_000_000,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HTTP_ADDR").unwrap_or(defaults.host),
            port: parse_or("HTTP_PORT", get("HTTP_PORT"), defaults.port)?,
            data_sets_path: get("DATA_SETS_PATH").map(PathBuf::from),
            lookup_timeout: Duration::from_millis(parse_or(
                "STATUS_LOOKUP_TIMEOUT_MS",
                get("STATUS_LOOKUP_TIMEOUT_MS"),
                defaults.lookup_timeout.as_millis() as u64,
            )?),
            min_timespan_days: parse_or(
                "MIN_TIMESPAN_DAYS",
                get("MIN_TIMESPAN_DAYS"),
                defaults.min_timespan_days,
            )?,
            max_gzip_size: parse_or("MAX_GZIP_SIZE", get("MAX_GZIP_SIZE"), defaults.max_gzip_size)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HTTP_PORT", "3000"),
            ("DATA_SETS_PATH", "/etc/datastore/data-sets.json"),
            ("STATUS_LOOKUP_TIMEOUT_MS", "250"),
            ("MIN_TIMESPAN_DAYS", "14"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.data_sets_path,
            Some(PathBuf::from("/etc/datastore/data-sets.json"))
        );
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.min_timespan_days, 14);
    }

    #[test]
    fn test_empty_value_uses_default() {
        assert_eq!(config(&[("HTTP_PORT", "")]).unwrap().port, 8080);
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let err = config(&[("MAX_GZIP_SIZE", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MAX_GZIP_SIZE", .. }));
        assert!(err.to_string().contains("\"lots\""));
    }
}
