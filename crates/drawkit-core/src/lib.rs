//! # DrawKit Core
//!
//! Core types shared by the DrawKit crates.
//! Provides plane geometry, colors, input events and the scene graph
//! contract that the designer drives.

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scene;

pub use color::Color;
pub use error::{Result, SceneError};
pub use geometry::{Affine, Bounds, Corner, Point};
pub use input::{FrameEvent, KeyEvent, ModifierKey, Modifiers, PointerEvent};
pub use scene::{Geometry, Layer, NodeId, Scene, SceneAdapter, Style};
