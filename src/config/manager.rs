//! Settings manager for loading and saving the host settings object
//!
//! This module provides functionality to load and save settings to
//! %APPDATA%\MapCover\settings.json with atomic writes to prevent corruption.

use crate::error::{MapCoverError, Result, StringError};
use crate::host::SettingsData;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the settings file
    ///
    /// Returns: %APPDATA%\MapCover\settings.json
    pub fn get_config_path() -> PathBuf {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("MapCover").join("settings.json")
    }

    /// Ensure the settings directory exists
    ///
    /// Creates %APPDATA%\MapCover if it doesn't exist
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_path = Self::get_config_path();
        let config_dir = config_path
            .parent()
            .ok_or_else(|| MapCoverError::ConfigError(StringError::new("Invalid config path")))?;

        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    }

    /// Load settings from the default location
    pub fn load() -> Result<SettingsData> {
        Self::load_from(&Self::get_config_path())
    }

    /// Load settings from `path`
    ///
    /// If the file doesn't exist or is corrupt, returns empty settings.
    pub fn load_from(path: &Path) -> Result<SettingsData> {
        if !path.exists() {
            info!("Settings file not found, using defaults");
            return Ok(SettingsData::default());
        }

        let json = std::fs::read_to_string(path)?;

        match serde_json::from_str(&json) {
            Ok(settings) => {
                info!("Settings loaded from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                warn!("Failed to parse settings, using defaults: {}", e);
                Ok(SettingsData::default())
            }
        }
    }

    /// Save settings to the default location
    pub fn save(settings: &SettingsData) -> Result<()> {
        Self::ensure_config_dir()?;
        Self::save_to(&Self::get_config_path(), settings)
    }

    /// Save settings to `path` with an atomic write
    ///
    /// Writes a temporary file in the same directory, then renames it over
    /// the target.
    pub fn save_to(path: &Path, settings: &SettingsData) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| MapCoverError::ConfigError(StringError::new("Invalid config path")))?;
        std::fs::create_dir_all(config_dir)?;

        let json = serde_json::to_string_pretty(settings)?;
        let mut temp = tempfile::NamedTempFile::new_in(config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path).map_err(|e| MapCoverError::IoError(e.error))?;

        info!("Settings saved to {}", path.display());
        Ok(())
    }
}
