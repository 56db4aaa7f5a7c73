//! Configuration loading and endpoint resolution.
//!
//! The endpoint is resolved in layers: CLI flag, then the `GEMCHAT_ENDPOINT`
//! environment variable, then the optional config file, then the built-in
//! default.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::core::constants::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV_VAR: &str = "GEMCHAT_ENDPOINT";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Base URL of the generation backend.
    pub endpoint: Option<String>,
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Loads the config file if one exists; a missing file is an empty
    /// config, not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "permacommons", "gemchat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Picks the generation endpoint: flag, environment, config file, default.
pub fn resolve_endpoint(flag: Option<&str>, config: &Config) -> String {
    if let Some(endpoint) = flag {
        return endpoint.to_string();
    }
    if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
        if !endpoint.is_empty() {
            return endpoint;
        }
    }
    if let Some(endpoint) = &config.endpoint {
        return endpoint.clone();
    }
    DEFAULT_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_parses_from_toml() {
        let config: Config = toml::from_str(r#"endpoint = "http://example.test:9090""#).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://example.test:9090"));
    }

    #[test]
    fn empty_config_has_no_endpoint() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn flag_wins_over_config_file() {
        let config = Config {
            endpoint: Some("http://from-config".to_string()),
        };
        assert_eq!(
            resolve_endpoint(Some("http://from-flag"), &config),
            "http://from-flag"
        );
    }

    #[test]
    fn config_file_wins_over_default() {
        let config = Config {
            endpoint: Some("http://from-config".to_string()),
        };
        assert_eq!(resolve_endpoint(None, &config), "http://from-config");
    }

    #[test]
    fn default_applies_when_nothing_is_set() {
        // Environment lookups are process-global; this test assumes the
        // variable is unset in the test environment, as it is in CI.
        if std::env::var(ENDPOINT_ENV_VAR).is_ok() {
            return;
        }
        assert_eq!(resolve_endpoint(None, &Config::default()), DEFAULT_ENDPOINT);
    }
}
