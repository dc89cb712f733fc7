//! Client settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. Session tokens
//! and cookies never go here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::endpoints::{Endpoints, DEFAULT_COMMUNITY_URL};
use crate::error::{ApiKeyError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Community base URL the key endpoints hang off
    pub community_url: String,
    /// Request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            community_url: DEFAULT_COMMUNITY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Settings {
    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Endpoints derived from the configured community URL
    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::with_base(&self.community_url)
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the given directory (defaults if absent)
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Load settings from the platform config directory
    pub fn from_default_dir() -> Result<Self> {
        Self::new(&Self::default_dir()?)
    }

    /// Get the platform config directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "community-apikey", "community-apikey")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| ApiKeyError::Config("Could not determine config directory".to_string()))
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(dir) = self.settings_file.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
