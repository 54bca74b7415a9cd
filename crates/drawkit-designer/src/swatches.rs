//! Fill colors offered for new shapes.

use drawkit_core::Color;
use drawkit_settings::Settings;

use crate::error::{DesignerError, Result};

/// Palette with one active entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatches {
    palette: Vec<Color>,
    active: usize,
}

impl Swatches {
    /// An empty palette falls back to a single `fallback` swatch.
    pub fn new(palette: Vec<Color>, fallback: Color) -> Self {
        let palette = if palette.is_empty() {
            vec![fallback]
        } else {
            palette
        };
        Self { palette, active: 0 }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.theme.palette.clone(), settings.default_fill())
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn active(&self) -> Color {
        self.palette[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.palette.len() {
            return Err(DesignerError::UnknownSwatch {
                index,
                len: self.palette.len(),
            });
        }
        self.active = index;
        Ok(())
    }
}

impl Default for Swatches {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
