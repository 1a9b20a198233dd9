//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/linkdeck/config.toml)
//! 3. Environment variables (LINKDECK_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::remote::Session;

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKDECK";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the dashboard API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Session token sent as a bearer credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Upper bound on a single HTTP exchange
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Quiet period after an edit before it is pushed
    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,

    /// In-flight pushes are abandoned after this long
    #[serde(default = "default_push_timeout_secs")]
    pub push_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            user_id: None,
            request_timeout_secs: default_request_timeout_secs(),
            sync_debounce_ms: default_sync_debounce_ms(),
            push_timeout_secs: default_push_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (LINKDECK_API_URL, LINKDECK_TOKEN, ...)
    /// 2. Config file (~/.config/linkdeck/config.toml or LINKDECK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        // Empty string clears the token
        if let Ok(val) = std::env::var(format!("{}_TOKEN", ENV_PREFIX)) {
            self.token = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_USER_ID", ENV_PREFIX)) {
            self.user_id = if val.is_empty() { None } else { Some(val) };
        }

        if let Some(secs) = env_number(&format!("{}_REQUEST_TIMEOUT_SECS", ENV_PREFIX)) {
            self.request_timeout_secs = secs;
        }

        if let Some(ms) = env_number(&format!("{}_SYNC_DEBOUNCE_MS", ENV_PREFIX)) {
            self.sync_debounce_ms = ms;
        }
    }

    /// Set a value by key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        match key {
            "api_url" => self.api_url = value.to_string(),
            "token" => self.token = optional(value),
            "user_id" => self.user_id = optional(value),
            "request_timeout_secs" => {
                self.request_timeout_secs = parse_number(key, value)?;
            }
            "sync_debounce_ms" => self.sync_debounce_ms = parse_number(key, value)?,
            "push_timeout_secs" => self.push_timeout_secs = parse_number(key, value)?,
            _ => anyhow::bail!(
                "Unknown config key: {}. Valid keys: api_url, token, user_id, \
                 request_timeout_secs, sync_debounce_ms, push_timeout_secs",
                key
            ),
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LINKDECK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkdeck")
            .join("config.toml")
    }

    /// Build the session described by this configuration
    pub fn session(&self) -> Session {
        let session = Session::new();
        if let Some(ref token) = self.token {
            session.sign_in(self.user_id.clone(), token.clone());
        }
        session
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_number(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number, got '{}'", key, value))
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_sync_debounce_ms() -> u64 {
    300
}

fn default_push_timeout_secs() -> u64 {
    30
}
