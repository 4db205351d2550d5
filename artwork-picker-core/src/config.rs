use crate::error::ConfigError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";
const DEFAULT_USER_AGENT: &str = "artwork-picker/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
// The public API asks anonymous clients to stay near one request per second
const DEFAULT_COOLDOWN_MS: u64 = 1000;

/// Settings for talking to the remote artwork catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub request_cooldown_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

impl CatalogConfig {
    /// Load `config.json` from the platform config directory, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: CatalogConfig = serde_json::from_str(&contents)?;
        info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "artwork-picker")
            .map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILENAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_cooldown(&self) -> Duration {
        Duration::from_millis(self.request_cooldown_ms)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
