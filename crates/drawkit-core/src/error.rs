//! Error handling for DrawKit core
//!
//! Scene graph operations report invariant violations (unknown nodes, detached
//! nodes, wrong node kinds) through [`SceneError`]. All error types use
//! `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::scene::NodeId;

/// Scene graph error type
///
/// Every variant describes a programming error on the caller's side: the
/// operation is aborted and the scene is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The node id was never allocated or has been removed
    #[error("Unknown scene node {0}")]
    UnknownNode(NodeId),

    /// The operation requires an attached node
    #[error("Scene node {0} is detached")]
    Detached(NodeId),

    /// The operation requires a container (group or layer)
    #[error("Scene node {0} is not a container")]
    NotAContainer(NodeId),

    /// The operation cannot be applied to a layer root
    #[error("Scene node {0} is a layer root")]
    LayerRoot(NodeId),

    /// A node cannot be moved inside its own subtree
    #[error("Scene node {node} cannot be moved into its descendant {parent}")]
    Cycle {
        /// The node being moved.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },

    /// The requested child index is outside the parent's children
    #[error("Index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of children in the parent.
        len: usize,
    },

    /// The matrix has no inverse
    #[error("Matrix is not invertible")]
    NonInvertible,
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
