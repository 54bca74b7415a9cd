//! Error handling for the designer
//!
//! Invariant violations (unknown or destroyed artefacts, handles that belong
//! to another artefact, malformed property updates) abort the current
//! operation through [`DesignerError`]. No-op conditions such as undoing an
//! empty history are not errors.

use drawkit_core::SceneError;
use thiserror::Error;

use crate::artefact::ArtefactId;
use crate::overlay::HandleRole;

/// Designer error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    /// The scene adapter rejected an operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The id was never registered
    #[error("Unknown artefact {0}")]
    UnknownArtefact(ArtefactId),

    /// The artefact was destroyed and not restored
    #[error("Artefact {0} has been destroyed")]
    Destroyed(ArtefactId),

    /// The handle does not belong to the artefact's overlay
    #[error("Handle {role} does not belong to artefact {artefact}")]
    ForeignHandle {
        /// The manipulated artefact.
        artefact: ArtefactId,
        /// The handle role that was requested.
        role: HandleRole,
    },

    /// The operation needs a group
    #[error("Artefact {0} is not a group")]
    NotAGroup(ArtefactId),

    /// The operation needs an artefact outside any group
    #[error("Artefact {0} is nested in a group")]
    NotTopLevel(ArtefactId),

    /// No tool is registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// No action is registered under this name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The palette has no swatch at this index
    #[error("No swatch at index {index} (palette holds {len})")]
    UnknownSwatch {
        /// Requested index.
        index: usize,
        /// Palette size.
        len: usize,
    },

    /// A property update named an unknown property or carried the wrong type
    #[error("Invalid property '{name}': {reason}")]
    InvalidProperty {
        /// Property name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for designer operations
pub type Result<T> = std::result::Result<T, DesignerError>;
