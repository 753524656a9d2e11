//! Configuration loading and persistence.
//!
//! Reads `config.json` from the homeguard config directory and applies
//! environment variable overrides on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;
use std::{fs, path::PathBuf};

use crate::notifications::ChannelConfig;

/// Configuration for the panel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where push tokens are submitted.
    pub registration_endpoint: String,
    /// Push-service project scope. Registration fails without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// User the push token is registered for.
    pub user_id: String,
    /// Timeout in seconds for the registration HTTP call.
    pub request_timeout_secs: u64,
    /// Notification channel upserted before token retrieval.
    pub channel: ChannelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registration_endpoint: "http://localhost:3000/api/push-tokens".to_string(),
            project_id: None,
            user_id: String::new(),
            request_timeout_secs: 30,
            channel: ChannelConfig::default(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// Directory selection priority:
    /// 1. `HOMEGUARD_CONFIG_DIR` env var: explicit override
    /// 2. `HOMEGUARD_ENV=test`: `<tmp>/homeguard-test`
    /// 3. Default: platform config dir + `homeguard`
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = std::env::var("HOMEGUARD_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else if crate::env::is_test_mode() {
            std::env::temp_dir().join("homeguard-test")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("homeguard")
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// A missing or unreadable file falls back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config: {e:#}");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            serde_json::from_str(&content).context("Failed to parse config.json")
        } else {
            anyhow::bail!("Config file not found")
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("HOMEGUARD_REGISTRATION_ENDPOINT") {
            self.registration_endpoint = endpoint;
        }

        if let Ok(project_id) = std::env::var("HOMEGUARD_PROJECT_ID") {
            self.project_id = Some(project_id);
        }

        if let Ok(user_id) = std::env::var("HOMEGUARD_USER_ID") {
            self.user_id = user_id;
        }

        if let Ok(timeout) = std::env::var("HOMEGUARD_REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.request_timeout_secs = secs;
            }
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)?;

        #[cfg(unix)]
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Timeout for the registration HTTP call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether a push-service project id is configured.
    pub fn has_project_id(&self) -> bool {
        self.project_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}
