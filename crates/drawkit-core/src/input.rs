//! Input events consumed by the drawing surface.
//!
//! Pointer and key capture belong to the host toolkit; it translates its own
//! events into these plain values before handing them to a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Modifier keys held while an event was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Whether the given modifier key is held.
    pub fn contains(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Control => self.control,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }

    /// Control on most platforms, Command on macOS.
    pub fn command(&self) -> bool {
        self.control || self.meta
    }
}

/// A single modifier key, used to configure gesture bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Meta,
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift => write!(f, "shift"),
            Self::Control => write!(f, "control"),
            Self::Alt => write!(f, "alt"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

impl FromStr for ModifierKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shift" => Ok(Self::Shift),
            "control" | "ctrl" => Ok(Self::Control),
            "alt" | "option" => Ok(Self::Alt),
            "meta" | "cmd" | "super" => Ok(Self::Meta),
            _ => Err(format!("Unknown modifier key: {}", s)),
        }
    }
}

/// Pointer event of a down → drag → up gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Current pointer position.
    pub point: Point,
    /// Position where the gesture started.
    pub down_point: Point,
    /// Movement since the previous event of the same gesture.
    pub delta: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A pointer-down at `point`.
    pub fn down(point: Point) -> Self {
        Self {
            point,
            down_point: point,
            delta: Point::ZERO,
            modifiers: Modifiers::NONE,
        }
    }

    /// A follow-up event moving from `previous` to `point`.
    pub fn moved(down_point: Point, previous: Point, point: Point) -> Self {
        Self {
            point,
            down_point,
            delta: point - previous,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Key press carrying a logical key name such as `"Delete"` or `"z"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Tick of the external per-frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameEvent {
    /// Number of frames since the clock started.
    pub count: u64,
    /// Seconds since the clock started.
    pub time: f64,
    /// Seconds since the previous frame.
    pub delta: f64,
}

impl FrameEvent {
    pub fn new(count: u64, time: f64, delta: f64) -> Self {
        Self { count, time, delta }
    }
}
