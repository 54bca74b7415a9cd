//! Session settings for DrawKit
//!
//! Provides the tunables of a drawing session, file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Settings are organized into logical sections:
//! - History (undo capacity)
//! - Canvas (overlay margin, handle size, minimum size, hit tolerance)
//! - Theme (accent and swatch palette)
//! - Animation defaults (rotate and bounce)
//! - Tools (gesture modifiers)

use std::path::Path;

use drawkit_core::constants::{
    BORDER_MARGIN, DEFAULT_ACCENT_HEX, DEFAULT_HISTORY_CAPACITY, FOOTPRINT_OPACITY, HANDLE_SIZE,
    HIT_TOLERANCE, MIN_SIZE,
};
use drawkit_core::{Color, ModifierKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undoable actions
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Canvas geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Gap between an artefact and its selection border
    pub border_margin: f64,
    /// Edge length of resize handles
    pub handle_size: f64,
    /// Size below which resizing freezes an axis
    pub min_size: f64,
    /// Pointer slop for hit-testing
    pub hit_tolerance: f64,
    /// Opacity of the footprint under selected artefacts
    pub footprint_opacity: f32,
    /// Stroke width of selection borders and handles
    pub selection_stroke_width: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            border_margin: BORDER_MARGIN,
            handle_size: HANDLE_SIZE,
            min_size: MIN_SIZE,
            hit_tolerance: HIT_TOLERANCE,
            footprint_opacity: FOOTPRINT_OPACITY,
            selection_stroke_width: 2.0,
        }
    }
}

/// Theme colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Accent used for selection decorations and footprints
    pub accent: Color,
    /// Swatches offered for new shapes; the first one is active initially
    pub palette: Vec<Color>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let palette = ["#4f46e5", "#e11d48", "#f59e0b", "#10b981", "#0f172a"]
            .iter()
            .filter_map(|hex| Color::from_hex(hex).ok())
            .collect();
        Self {
            accent: Color::from_hex(DEFAULT_ACCENT_HEX).unwrap_or(Color::BLACK),
            palette,
        }
    }
}

/// Defaults for newly created animations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Rotation speed in degrees per frame
    pub rotate_speed: f64,
    /// Bounce progress per frame, in `(0, 1]`
    pub bounce_speed: f64,
    /// Horizontal distance of the initial bounce target
    pub bounce_distance: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 2.0,
            bounce_speed: 0.02,
            bounce_distance: 80.0,
        }
    }
}

/// Gesture modifier bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Toggles selection membership instead of replacing it
    pub additive_modifier: ModifierKey,
    /// Duplicates the selection while dragging
    pub duplicate_modifier: ModifierKey,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            additive_modifier: ModifierKey::Shift,
            duplicate_modifier: ModifierKey::Alt,
        }
    }
}

/// Complete session configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub history: HistorySettings,
    pub canvas: CanvasSettings,
    pub theme: ThemeSettings,
    pub animation: AnimationSettings,
    pub tools: ToolSettings,
}

impl Settings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;
        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        settings.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.history.capacity == 0 {
            return Err(SettingsError::invalid(
                "history.capacity",
                "must be at least 1",
            ));
        }

        let canvas = &self.canvas;
        if !(canvas.border_margin >= 0.0) {
            return Err(SettingsError::invalid(
                "canvas.border_margin",
                "must be >= 0",
            ));
        }
        if !(canvas.handle_size > 0.0) {
            return Err(SettingsError::invalid("canvas.handle_size", "must be > 0"));
        }
        if !(canvas.min_size > 0.0) {
            return Err(SettingsError::invalid("canvas.min_size", "must be > 0"));
        }
        if !(canvas.hit_tolerance >= 0.0) {
            return Err(SettingsError::invalid(
                "canvas.hit_tolerance",
                "must be >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&canvas.footprint_opacity) {
            return Err(SettingsError::invalid(
                "canvas.footprint_opacity",
                "must be within 0..=1",
            ));
        }
        if !(canvas.selection_stroke_width > 0.0) {
            return Err(SettingsError::invalid(
                "canvas.selection_stroke_width",
                "must be > 0",
            ));
        }

        if self.theme.palette.is_empty() {
            return Err(SettingsError::invalid(
                "theme.palette",
                "must contain at least one color",
            ));
        }

        let animation = &self.animation;
        if !animation.rotate_speed.is_finite() {
            return Err(SettingsError::invalid(
                "animation.rotate_speed",
                "must be finite",
            ));
        }
        if !(animation.bounce_speed > 0.0 && animation.bounce_speed <= 1.0) {
            return Err(SettingsError::invalid(
                "animation.bounce_speed",
                "must be within (0, 1]",
            ));
        }
        if !(animation.bounce_distance.is_finite() && animation.bounce_distance > 0.0) {
            return Err(SettingsError::invalid(
                "animation.bounce_distance",
                "must be > 0",
            ));
        }

        if self.tools.additive_modifier == self.tools.duplicate_modifier {
            return Err(SettingsError::invalid(
                "tools.duplicate_modifier",
                format!("conflicts with additive modifier {}", self.tools.additive_modifier),
            ));
        }

        Ok(())
    }

    /// Swatch used for new shapes when nothing else was picked
    pub fn default_fill(&self) -> Color {
        self.theme.palette.first().copied().unwrap_or(self.theme.accent)
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::unsupported(path)),
        }
    }
}
