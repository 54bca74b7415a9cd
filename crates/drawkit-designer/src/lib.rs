//! # DrawKit Designer
//!
//! Interactive core of the drawing surface: artefacts with their bounding
//! overlays, per-kind animations, the undo/redo history and the tool
//! dispatch state machine.
//!
//! ## Architecture
//!
//! ```text
//! Session (owned context)
//!   ├── Canvas
//!   │     ├── Scene adapter (geometry nodes)
//!   │     ├── Artefact registry
//!   │     │     └── Artefact ── Bounding overlay, Animation
//!   │     └── Selection manager
//!   ├── History (DesignerCommand values)
//!   ├── Tool state machine + tool registry
//!   ├── Action registry
//!   └── Swatches, frame clock
//! ```
//!
//! Pointer gestures enter the [`Tool`] machine, which hit-tests the canvas,
//! mutates artefacts and registers one [`DesignerCommand`] per finished
//! action with the [`History`].

pub mod actions;
pub mod animation;
pub mod artefact;
pub mod canvas;
pub mod commands;
pub mod error;
pub mod history;
pub mod overlay;
pub mod registry;
pub mod selection_manager;
pub mod session;
pub mod swatches;
pub mod tools;

pub use actions::{Action, ActionRegistry};
pub use animation::{
    Animation, AnimationKind, AnimationProperties, AnimationSnapshot, AnimationState,
    AnimationUpdate, BounceProperties, Property, PropertyValue, RotateProperties,
};
pub use artefact::{Artefact, ArtefactId, ArtefactKind};
pub use canvas::{Canvas, Detached, HitTarget, ShapeState, Ungrouped};
pub use commands::{CompositeCommand, DesignerCommand};
pub use error::{DesignerError, Result};
pub use history::{Command, History};
pub use overlay::{BoundingOverlay, Handle, HandleRole, OverlayStyle};
pub use registry::ArtefactRegistry;
pub use selection_manager::SelectionManager;
pub use session::{FrameClock, Session, SessionId};
pub use swatches::Swatches;
pub use tools::{Tool, ToolContext, ToolKind, ToolRegistry, Transition};
