//! Backend selection from environment variables.

use super::memory::DEV_TOKEN;
use crate::cache::DEFAULT_TTL;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub app_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// In-process stores with a single dev user.
    Memory { dev_token: String },
    Remote(RemoteConfig),
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// - `FAMILY_TABLE_BACKEND`: `memory` (default) or `remote`
    /// - `FAMILY_TABLE_DEV_TOKEN`: dev user token for the memory backend
    ///
    /// Required for `remote`:
    /// - `FAMILY_TABLE_BACKEND_URL`: API base URL
    /// - `FAMILY_TABLE_APP_ID`: application id sent with every request
    ///
    /// Optional for `remote`:
    /// - `FAMILY_TABLE_BACKEND_TIMEOUT_SECS`: request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let kind = var("FAMILY_TABLE_BACKEND").unwrap_or_else(|| "memory".to_string());

        match kind.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendConfig::Memory {
                dev_token: var("FAMILY_TABLE_DEV_TOKEN").unwrap_or_else(|| DEV_TOKEN.to_string()),
            }),
            "remote" => {
                let base_url = required(&var, "FAMILY_TABLE_BACKEND_URL")?;
                if reqwest::Url::parse(&base_url).is_err() {
                    return Err(ConfigError::InvalidValue {
                        var: "FAMILY_TABLE_BACKEND_URL".to_string(),
                        value: base_url,
                    });
                }
                let app_id = required(&var, "FAMILY_TABLE_APP_ID")?;

                let timeout_secs = match var("FAMILY_TABLE_BACKEND_TIMEOUT_SECS") {
                    Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                        var: "FAMILY_TABLE_BACKEND_TIMEOUT_SECS".to_string(),
                        value: v,
                    })?,
                    None => DEFAULT_TIMEOUT_SECS,
                };

                Ok(BackendConfig::Remote(RemoteConfig {
                    base_url,
                    app_id,
                    timeout: Duration::from_secs(timeout_secs),
                }))
            }
            _ => Err(ConfigError::InvalidValue {
                var: "FAMILY_TABLE_BACKEND".to_string(),
                value: kind,
            }),
        }
    }
}

/// How long fetched lists are served from cache, from `FAMILY_TABLE_CACHE_TTL_SECS`
/// (default: 30). Writes made by other clients show up at most this late.
pub fn cache_ttl_from_env() -> Result<Duration, ConfigError> {
    cache_ttl_from_vars(|name| env::var(name).ok())
}

pub fn cache_ttl_from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
    match var("FAMILY_TABLE_CACHE_TTL_SECS") {
        Some(v) => v
            .trim()
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue {
                var: "FAMILY_TABLE_CACHE_TTL_SECS".to_string(),
                value: v,
            }),
        None => Ok(DEFAULT_TTL),
    }
}

fn required(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    var(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<BackendConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BackendConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_to_memory() {
        assert_eq!(
            load(&[]).unwrap(),
            BackendConfig::Memory {
                dev_token: DEV_TOKEN.to_string()
            }
        );
    }

    #[test]
    fn test_remote() {
        let config = load(&[
            ("FAMILY_TABLE_BACKEND", "remote"),
            ("FAMILY_TABLE_BACKEND_URL", "https://api.example.com"),
            ("FAMILY_TABLE_APP_ID", "app-1"),
            ("FAMILY_TABLE_BACKEND_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(
            config,
            BackendConfig::Remote(RemoteConfig {
                base_url: "https://api.example.com".to_string(),
                app_id: "app-1".to_string(),
                timeout: Duration::from_secs(5),
            })
        );
    }

    #[test]
    fn test_remote_missing_url() {
        assert_eq!(
            load(&[("FAMILY_TABLE_BACKEND", "remote")]),
            Err(ConfigError::MissingEnvVar(
                "FAMILY_TABLE_BACKEND_URL".to_string()
            ))
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("FAMILY_TABLE_BACKEND", "postgres")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[
                ("FAMILY_TABLE_BACKEND", "remote"),
                ("FAMILY_TABLE_BACKEND_URL", "https://api.example.com"),
                ("FAMILY_TABLE_APP_ID", "app-1"),
                ("FAMILY_TABLE_BACKEND_TIMEOUT_SECS", "soon"),
            ]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_cache_ttl() {
        assert_eq!(cache_ttl_from_vars(|_| None).unwrap(), DEFAULT_TTL);
        assert_eq!(
            cache_ttl_from_vars(|_| Some("5".to_string())).unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            cache_ttl_from_vars(|_| Some("soon".to_string())),
            Err(ConfigError::InvalidValue {
                var: "FAMILY_TABLE_CACHE_TTL_SECS".to_string(),
                value: "soon".to_string(),
            })
        );
    }
}
