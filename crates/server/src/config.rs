//! Server configuration from the environment

use crate::service::{YearRange, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default registry file name, as written by `emissions train`
pub const DEFAULT_MODELS_PATH: &str = "country_emissions_models.json";

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Runtime configuration of the forecast service
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Registry file loaded at startup
    pub models_path: PathBuf,
    /// Year range used when a request omits `start_year` or `end_year`
    pub default_range: YearRange,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            models_path: PathBuf::from(DEFAULT_MODELS_PATH),
            default_range: YearRange {
                start: DEFAULT_START_YEAR,
                end: DEFAULT_END_YEAR,
            },
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `EMISSIONS_MODELS_PATH`,
    /// `FORECAST_DEFAULT_START_YEAR` and `FORECAST_DEFAULT_END_YEAR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port)?;
        let models_path = lookup("EMISSIONS_MODELS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.models_path);
        let default_range = default_range_from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            models_path,
            default_range,
        })
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST".to_string(),
            value: self.host.clone(),
            reason: "not a valid IP address".to_string(),
        })
    }
}

/// Default forecast range from `FORECAST_DEFAULT_START_YEAR` and
/// `FORECAST_DEFAULT_END_YEAR` only, ignoring the server keys.
pub fn default_range_from_env() -> Result<YearRange, ConfigError> {
    default_range_from_lookup(&|key: &str| env::var(key).ok())
}

fn default_range_from_lookup<F>(lookup: &F) -> Result<YearRange, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let start = parse_or(lookup, "FORECAST_DEFAULT_START_YEAR", DEFAULT_START_YEAR)?;
    let end = parse_or(lookup, "FORECAST_DEFAULT_END_YEAR", DEFAULT_END_YEAR)?;

    YearRange::new(start, end).map_err(|e| ConfigError::Invalid {
        key: "FORECAST_DEFAULT_END_YEAR".to_string(),
        value: end.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.default_range.start, 2024);
        assert_eq!(config.default_range.end, 2050);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "5000"),
            ("EMISSIONS_MODELS_PATH", "/srv/models.json"),
            ("FORECAST_DEFAULT_START_YEAR", "2023"),
            ("FORECAST_DEFAULT_END_YEAR", "2030"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
        assert_eq!(config.models_path, PathBuf::from("/srv/models.json"));
        assert_eq!(config.default_range, YearRange { start: 2023, end: 2030 });
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key, .. }) if key == "PORT"));
    }

    #[test]
    fn test_inverted_default_range() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("FORECAST_DEFAULT_START_YEAR", "2050"),
            ("FORECAST_DEFAULT_END_YEAR", "2024"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_range_ignores_server_keys() {
        let lookup = lookup_from(&[
            ("PORT", "eighty"),
            ("FORECAST_DEFAULT_START_YEAR", "2030"),
        ]);
        assert!(ServerConfig::from_lookup(&lookup).is_err());
        assert_eq!(
            default_range_from_lookup(&lookup).unwrap(),
            YearRange { start: 2030, end: 2050 }
        );
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
