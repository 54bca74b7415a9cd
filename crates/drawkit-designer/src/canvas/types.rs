//! Canvas type definitions: Detached, ShapeState, Ungrouped, HitTarget.

use drawkit_core::{Affine, Geometry, NodeId};

use crate::animation::{AnimationProperties, AnimationSnapshot};
use crate::artefact::{Artefact, ArtefactId};
use crate::overlay::HandleRole;

/// A destroyed top-level artefact, kept so it can be restored.
///
/// The geometry node stays in the scene, unlinked, until the value is
/// handed back to [`Canvas::restore`](super::Canvas::restore) or
/// [`Canvas::release`](super::Canvas::release).
#[derive(Debug, Clone)]
pub struct Detached {
    pub root: ArtefactId,
    /// The root first, then every descendant.
    pub(crate) artefacts: Vec<Artefact>,
    pub(crate) animations: Vec<(ArtefactId, AnimationSnapshot)>,
    pub(crate) parent: NodeId,
    pub(crate) index: usize,
}

impl Detached {
    pub fn node(&self) -> Option<NodeId> {
        self.artefacts.first().map(Artefact::node)
    }
}

/// Rest shape of a top-level artefact, captured around a resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeState {
    pub shadow: Geometry,
    /// Container matrix; `None` for leaves.
    pub matrix: Option<Affine>,
    pub animation: Option<AnimationProperties>,
}

/// What [`Canvas::ungroup`](super::Canvas::ungroup) took apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Ungrouped {
    pub children: Vec<ArtefactId>,
    pub matrix: Affine,
    pub animation: Option<AnimationSnapshot>,
}

/// Result of hit-testing the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    None,
    /// A top-level artefact, resolved from whatever member was hit.
    Artefact(ArtefactId),
    ResizeHandle { owner: ArtefactId, role: HandleRole },
    AnimationHandle { owner: ArtefactId },
}
