//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-times.toml file. Configuration is optional: every field has a
//! sensible default, and a missing or broken file never stops the program.
//!
//! The WorldTides access key is the one setting most installs need. It can
//! live in the `[api]` table of the config file or in the
//! `WORLDTIDES_API_KEY` environment variable; the environment wins so that
//! keys can be kept out of files entirely.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::worldtides;

/// Environment variable consulted for the WorldTides access key.
pub const API_KEY_ENV: &str = "WORLDTIDES_API_KEY";

/// Application configuration loaded from tide-times.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// WorldTides API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// WorldTides API configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Endpoint base URL; only worth changing to point at a test server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Access key; superseded by the environment variable when both are set
    #[serde(default)]
    pub key: Option<String>,
}

fn default_base_url() -> String {
    worldtides::DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            key: None,
        }
    }
}

impl Config {
    /// Load configuration from the tide-times.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("tide-times.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("loaded configuration from {}", path.as_ref().display());
                    config
                }
                Err(e) => {
                    warn!("invalid config file format: {e}");
                    warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Resolve the WorldTides access key: environment first, then the file.
    ///
    /// Returns `None` when neither source provides a non-empty key.
    pub fn api_key(&self) -> Option<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => self.api.key.clone().filter(|key| !key.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, worldtides::DEFAULT_BASE_URL);
        assert_eq!(config.api.key, None);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.api.key = Some("secret".to_string());

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.api.key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[api]\nkey = \"abc\"\n").unwrap();
        assert_eq!(parsed.api.base_url, worldtides::DEFAULT_BASE_URL);
        assert_eq!(parsed.api.key.as_deref(), Some("abc"));

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty.api.key, None);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.api.base_url, worldtides::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_invalid_file_falls_back_to_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tide-times.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.api.base_url, worldtides::DEFAULT_BASE_URL);
        assert_eq!(config.api.key, None);
    }

    // Environment precedence cases share one test body; parallel tests
    // mutating the same process-wide variable would race.
    #[test]
    fn test_api_key_precedence() {
        let mut config = Config::default();
        config.api.key = Some("from-file".to_string());

        std::env::remove_var(API_KEY_ENV);
        assert_eq!(config.api_key().as_deref(), Some("from-file"));

        std::env::set_var(API_KEY_ENV, "");
        assert_eq!(config.api_key().as_deref(), Some("from-file"));

        std::env::set_var(API_KEY_ENV, "from-env");
        assert_eq!(config.api_key().as_deref(), Some("from-env"));

        // An empty file key is as good as none; it must not short-circuit
        // the missing-credential error.
        std::env::remove_var(API_KEY_ENV);
        config.api.key = Some(String::new());
        assert_eq!(config.api_key(), None);

        config.api.key = None;
        assert_eq!(config.api_key(), None);
    }
}
