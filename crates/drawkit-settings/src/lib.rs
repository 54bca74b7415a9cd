//! DrawKit Settings Crate
//!
//! Handles the tunables of a drawing session and their persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    AnimationSettings, CanvasSettings, HistorySettings, Settings, ThemeSettings, ToolSettings,
};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{default_config_path, SettingsPersistence};
