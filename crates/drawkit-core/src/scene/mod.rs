//! Scene graph contract consumed by the designer.
//!
//! The designer never renders anything itself. It drives a retained scene
//! graph through [`SceneAdapter`]: create shapes and containers, read and bake
//! transforms, reorder siblings, hit-test. [`Scene`] is the in-memory
//! implementation used by the headless binary and the test-suite.

mod graph;
mod shape;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Affine, Bounds, Point};

pub use graph::Scene;
pub use shape::Geometry;

/// Opaque handle to a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stacked root containers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Translucent footprints of selected artefacts.
    Footprint,
    /// User artefacts.
    Drawing,
    /// Selection borders, handles and tool guides.
    Overlay,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Footprint, Layer::Drawing, Layer::Overlay];

    fn slot(self) -> usize {
        match self {
            Layer::Footprint => 0,
            Layer::Drawing => 1,
            Layer::Overlay => 2,
        }
    }
}

/// Paint and interaction attributes of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub dashed: bool,
    pub opacity: f32,
    pub visible: bool,
    /// Non hit-testable nodes are skipped by [`SceneAdapter::hit_test`].
    pub hit_testable: bool,
    /// Selection highlight painted over the regular stroke.
    pub highlight: Option<Color>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            dashed: false,
            opacity: 1.0,
            visible: true,
            hit_testable: true,
            highlight: None,
        }
    }
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn outline(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn inert(mut self) -> Self {
        self.hit_testable = false;
        self
    }
}

/// Operations the designer needs from a retained scene graph.
///
/// Leaf geometry lives in its parent's coordinate space; containers carry a
/// matrix mapping their children into the parent's space. Layer roots always
/// use the identity matrix.
pub trait SceneAdapter {
    /// Root container of a layer.
    fn layer(&self, layer: Layer) -> NodeId;

    /// Creates a leaf on top of `parent`'s children.
    fn create_shape(&mut self, parent: NodeId, geometry: Geometry, style: Style)
        -> Result<NodeId>;

    /// Creates a container in `parent` directly above the topmost of
    /// `children` already in `parent` (or on top), then moves `children` into
    /// it in the given order.
    fn create_container(&mut self, parent: NodeId, children: &[NodeId]) -> Result<NodeId>;

    /// Deep-copies a subtree. An attached copy lands directly above the
    /// original; a detached original yields a detached copy.
    fn clone_node(&mut self, id: NodeId) -> Result<NodeId>;

    /// Whether the id refers to a live node, attached or not.
    fn contains(&self, id: NodeId) -> bool;

    /// Whether the node is reachable from a layer root.
    fn is_attached(&self, id: NodeId) -> bool;

    fn geometry(&self, id: NodeId) -> Result<&Geometry>;

    fn set_geometry(&mut self, id: NodeId, geometry: Geometry) -> Result<()>;

    fn style(&self, id: NodeId) -> Result<&Style>;

    fn set_style(&mut self, id: NodeId, style: Style) -> Result<()>;

    /// Own matrix of a container; identity for leaves.
    fn matrix(&self, id: NodeId) -> Result<Affine>;

    fn set_matrix(&mut self, id: NodeId, matrix: Affine) -> Result<()>;

    /// Accumulated matrix of all ancestors, mapping the node's parent space
    /// to world space.
    fn parent_matrix(&self, id: NodeId) -> Result<Affine>;

    /// World-space axis-aligned bounds. An empty container collapses to its
    /// origin.
    fn bounds(&self, id: NodeId) -> Result<Bounds>;

    fn unite(&self, a: &Bounds, b: &Bounds) -> Bounds {
        a.union(b)
    }

    /// Applies `m` in the node's parent space: baked into leaf geometry,
    /// composed onto a container's matrix.
    fn transform(&mut self, id: NodeId, m: &Affine) -> Result<()>;

    /// Topmost visible, hit-testable leaf under `point` (world space),
    /// searching the overlay layer before the drawing layer.
    fn hit_test(&self, point: Point, tolerance: f64) -> Option<NodeId>;

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>>;

    fn children(&self, id: NodeId) -> Result<&[NodeId]>;

    /// Position of an attached node among its siblings (0 = bottom).
    fn index_of(&self, id: NodeId) -> Result<usize>;

    fn bring_to_front(&mut self, id: NodeId) -> Result<()>;

    fn send_to_back(&mut self, id: NodeId) -> Result<()>;

    /// Moves a node (attached or detached) into `parent` at `index`.
    fn insert_at(&mut self, id: NodeId, parent: NodeId, index: usize) -> Result<()>;

    /// Moves a node directly above `target` in `target`'s parent.
    fn insert_above(&mut self, id: NodeId, target: NodeId) -> Result<()> {
        let parent = self.parent(target)?.ok_or(crate::error::SceneError::Detached(target))?;
        let index = self.index_of(target)?;
        let same_parent = self.parent(id)? == Some(parent);
        let below_target = same_parent && self.index_of(id)? < index;
        let index = if below_target { index } else { index + 1 };
        self.insert_at(id, parent, index)
    }

    /// Unlinks an attached node, keeping it alive. Returns its former parent
    /// and index so it can be reinserted.
    fn detach(&mut self, id: NodeId) -> Result<(NodeId, usize)>;

    /// Destroys a node and its subtree.
    fn remove(&mut self, id: NodeId) -> Result<()>;

    /// World-space outline of a leaf, `None` for containers.
    fn path(&self, id: NodeId) -> Result<Option<lyon::path::Path>>;
}
