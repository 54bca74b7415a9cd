//! Settings Persistence
//!
//! Resolves the platform config location and keeps a loaded [`Settings`]
//! together with the file it came from.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{SettingsError, SettingsResult};

const CONFIG_DIR: &str = "drawkit";
const CONFIG_FILE: &str = "settings.toml";

/// Platform-specific settings file, e.g. `~/.config/drawkit/settings.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| SettingsError::ConfigDirectory("no config directory on this platform".into()))
}

/// Settings bound to their backing file
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    settings: Settings,
}

impl SettingsPersistence {
    /// Defaults bound to `path`, nothing read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    /// Load settings from `path`
    pub fn load(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let settings = Settings::load_from_file(&path)?;
        Ok(Self { path, settings })
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing. Other failures are reported.
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::new(path));
        }
        Self::load(path).inspect_err(|e| warn!("Failed to load settings: {}", e))
    }

    /// Save settings to the bound file, creating its directory when needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        self.settings.save_to_file(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
