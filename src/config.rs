use chrono::NaiveTime;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::services::meroshare::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub meroshare_base_url: String,
    pub meroshare_timeout: Duration,
    /// Local wall-clock time of the daily share application run.
    pub share_apply_time: NaiveTime,
    pub share_apply_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Invalid optional values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_or_default(&lookup, "BIND_ADDR", Config::default().bind_addr, |v| {
            v.parse::<SocketAddr>().ok()
        });

        let meroshare_base_url = lookup("MEROSHARE_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = parse_or_default(&lookup, "MEROSHARE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS, |v| {
            v.parse::<u64>().ok().filter(|secs| *secs > 0)
        });

        let share_apply_time = parse_or_default(&lookup, "SHARE_APPLY_TIME", NaiveTime::MIN, |v| {
            NaiveTime::parse_from_str(v, "%H:%M").ok()
        });

        let share_apply_on_startup =
            parse_or_default(&lookup, "SHARE_APPLY_ON_STARTUP", true, |v| {
                match v.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => Some(true),
                    "false" | "0" | "no" => Some(false),
                    _ => None,
                }
            });

        Ok(Self {
            database_url,
            bind_addr,
            meroshare_base_url,
            meroshare_timeout: Duration::from_secs(timeout_secs),
            share_apply_time,
            share_apply_on_startup,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            meroshare_base_url: DEFAULT_BASE_URL.to_string(),
            meroshare_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            share_apply_time: NaiveTime::MIN,
            share_apply_on_startup: true,
        }
    }
}

fn parse_or_default<T, F, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    T: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            tracing::warn!("Invalid value for {}: '{}', using default {}", key, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/meroshare")])).unwrap();
        let default = Config::default();
        assert_eq!(config.bind_addr, default.bind_addr);
        assert_eq!(config.meroshare_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.meroshare_timeout, Duration::from_secs(30));
        assert_eq!(config.share_apply_time, NaiveTime::MIN);
        assert!(config.share_apply_on_startup);
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meroshare"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("MEROSHARE_BASE_URL", "http://localhost:7000/api/meroShare"),
            ("MEROSHARE_TIMEOUT_SECS", "5"),
            ("SHARE_APPLY_TIME", "10:30"),
            ("SHARE_APPLY_ON_STARTUP", "false"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.meroshare_base_url, "http://localhost:7000/api/meroShare");
        assert_eq!(config.meroshare_timeout, Duration::from_secs(5));
        assert_eq!(config.share_apply_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert!(!config.share_apply_on_startup);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meroshare"),
            ("BIND_ADDR", "not-an-address"),
            ("MEROSHARE_TIMEOUT_SECS", "0"),
            ("SHARE_APPLY_TIME", "25:99"),
            ("SHARE_APPLY_ON_STARTUP", "maybe"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, Config::default().bind_addr);
        assert_eq!(config.meroshare_timeout, Duration::from_secs(30));
        assert_eq!(config.share_apply_time, NaiveTime::MIN);
        assert!(config.share_apply_on_startup);
    }
}
