use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::utils::paths::get_config_path;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "DECKHAND_API_URL";

/// Remote API location and endpoint paths (relative to `base_url`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_tree_path")]
    pub tree_path: String,

    #[serde(default = "default_sync_status_path")]
    pub sync_status_path: String,

    /// Bulk refresh; the poller runs until this request completes
    #[serde(default = "default_sync_path")]
    pub sync_path: String,

    #[serde(default = "default_set_mark_path")]
    pub set_mark_path: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_tree_path() -> String {
    "presentations/tree".to_string()
}

fn default_sync_status_path() -> String {
    "presentations/sync-status".to_string()
}

fn default_sync_path() -> String {
    "presentations/sync".to_string()
}

fn default_set_mark_path() -> String {
    "files/folders/set-mark".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            tree_path: default_tree_path(),
            sync_status_path: default_sync_status_path(),
            sync_path: default_sync_path(),
            set_mark_path: default_set_mark_path(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.api.base_url = url.trim().to_string();
        }
    }
}
