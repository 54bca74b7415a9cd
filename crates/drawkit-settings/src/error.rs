//! Errors raised while reading, writing or validating settings.

use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    /// A value is out of range.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Settings files are either `.json` or `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot encode TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

impl SettingsError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Format error for a path without a recognised extension.
    pub(crate) fn unsupported(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<none>".to_string());
        Self::UnsupportedFormat(ext)
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
