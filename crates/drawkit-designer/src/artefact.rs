//! Artefacts: the logical drawables wrapping one scene node each.

use std::fmt;

use drawkit_core::{Affine, Bounds, Color, Geometry, NodeId, SceneAdapter, Style};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{Animation, AnimationTarget};
use crate::error::Result;
use crate::overlay::{BoundingOverlay, OverlayStyle};

/// Stable identity of an artefact, kept across destroy and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtefactId(pub u64);

impl fmt::Display for ArtefactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtefactKind {
    Rectangle,
    Circle,
    Group,
}

impl fmt::Display for ArtefactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => write!(f, "rectangle"),
            Self::Circle => write!(f, "circle"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// A rectangle, circle or group on the canvas.
///
/// The `shadow` is the un-animated shape in the node's parent space. Leaf
/// shadows are congruent to the geometry at rest; a group's shadow is the
/// rectangle of its children's united shadow bounds projected through the
/// group matrix. Overlays and bounds queries are derived from it, so they do
/// not move while an animation displaces the visible geometry.
#[derive(Debug, Clone)]
pub struct Artefact {
    pub(crate) id: ArtefactId,
    pub(crate) kind: ArtefactKind,
    pub(crate) node: NodeId,
    pub(crate) shadow: Geometry,
    pub(crate) selected: bool,
    pub(crate) overlay: Option<BoundingOverlay>,
    pub(crate) animation: Option<Animation>,
    pub(crate) children: Vec<ArtefactId>,
    pub(crate) parent: Option<ArtefactId>,
}

impl Artefact {
    pub(crate) fn leaf(id: ArtefactId, kind: ArtefactKind, node: NodeId, shadow: Geometry) -> Self {
        Self {
            id,
            kind,
            node,
            shadow,
            selected: false,
            overlay: None,
            animation: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn group(
        id: ArtefactId,
        node: NodeId,
        shadow: Geometry,
        children: Vec<ArtefactId>,
    ) -> Self {
        Self {
            children,
            ..Self::leaf(id, ArtefactKind::Group, node, shadow)
        }
    }

    pub fn id(&self) -> ArtefactId {
        self.id
    }

    pub fn kind(&self) -> ArtefactKind {
        self.kind
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn shadow(&self) -> &Geometry {
        &self.shadow
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_group(&self) -> bool {
        self.kind == ArtefactKind::Group
    }

    pub fn overlay(&self) -> Option<&BoundingOverlay> {
        self.overlay.as_ref()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn children(&self) -> &[ArtefactId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ArtefactId> {
        self.parent
    }

    /// Whether an animation currently displaces the geometry.
    pub fn is_animating(&self) -> bool {
        self.animation.as_ref().is_some_and(Animation::is_running)
    }

    /// Bounds of the cached shadow in the parent space.
    pub(crate) fn cached_shadow_bounds(&self) -> Bounds {
        self.shadow.bounds().unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Builds the overlay, highlights the node and shows animation handles.
    /// Returns `false` when already selected.
    pub(crate) fn select<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        style: &OverlayStyle,
    ) -> Result<bool> {
        if self.selected {
            return Ok(false);
        }
        let to_world = scene.parent_matrix(self.node)?;
        if self.overlay.is_none() {
            let world_shadow = self.shadow.transformed(&to_world);
            self.overlay = Some(BoundingOverlay::build(scene, self.kind, &world_shadow, style)?);
        }
        self.set_highlight(scene, Some(style.accent))?;
        if let Some(animation) = &mut self.animation {
            animation.draw_handles(scene, &to_world, style)?;
        }
        self.selected = true;
        debug!("Selected artefact {}", self.id);
        Ok(true)
    }

    /// Tears down the overlay, highlight and animation handles. Returns
    /// `false` when not selected.
    pub(crate) fn deselect<S: SceneAdapter>(&mut self, scene: &mut S) -> Result<bool> {
        if !self.selected {
            return Ok(false);
        }
        if let Some(overlay) = self.overlay.take() {
            overlay.remove(scene)?;
        }
        self.set_highlight(scene, None)?;
        if let Some(animation) = &mut self.animation {
            animation.clear_handles(scene)?;
        }
        self.selected = false;
        debug!("Deselected artefact {}", self.id);
        Ok(true)
    }

    /// Rebuilds the decorations of a selected artefact after its shadow
    /// changed shape.
    pub(crate) fn refresh<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        style: &OverlayStyle,
    ) -> Result<()> {
        if !self.selected {
            return Ok(());
        }
        if let Some(overlay) = self.overlay.take() {
            overlay.remove(scene)?;
        }
        let to_world = scene.parent_matrix(self.node)?;
        let world_shadow = self.shadow.transformed(&to_world);
        self.overlay = Some(BoundingOverlay::build(scene, self.kind, &world_shadow, style)?);
        if let Some(animation) = &mut self.animation {
            animation.draw_handles(scene, &to_world, style)?;
        }
        Ok(())
    }

    /// Applies `m` (parent space) to geometry, shadow, overlay and animation.
    pub(crate) fn transform<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        m: &Affine,
        style: &OverlayStyle,
    ) -> Result<()> {
        scene.transform(self.node, m)?;
        self.shadow.transform(m);
        if let Some(animation) = &mut self.animation {
            animation.transform(m);
        }

        if self.overlay.is_none() {
            return Ok(());
        }
        if !is_rigid(m) {
            return self.refresh(scene, style);
        }
        let to_world = scene.parent_matrix(self.node)?;
        let world_m = match to_world.inverse() {
            Some(inverse) => inverse.then(m).then(&to_world),
            None => *m,
        };
        if let Some(overlay) = &mut self.overlay {
            overlay.transform(scene, &world_m)?;
        }
        if let Some(animation) = &mut self.animation {
            animation.draw_handles(scene, &to_world, style)?;
        }
        Ok(())
    }

    /// Splits the artefact into its animation and the geometry it drives.
    pub(crate) fn animation_parts<'a, S: SceneAdapter>(
        &'a mut self,
        scene: &'a mut S,
    ) -> Option<(&'a mut Animation, AnimationTarget<'a, S>)> {
        let Self {
            animation,
            node,
            kind,
            shadow,
            ..
        } = self;
        let animation = animation.as_mut()?;
        Some((
            animation,
            AnimationTarget {
                scene,
                node: *node,
                kind: *kind,
                shadow,
            },
        ))
    }

    /// Replaces a leaf's rest shape. `m` carries the animation properties
    /// along with the change.
    pub(crate) fn reshape<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        shadow: Geometry,
        m: &Affine,
        style: &OverlayStyle,
    ) -> Result<()> {
        scene.set_geometry(self.node, shadow.clone())?;
        self.shadow = shadow;
        if let Some(animation) = &mut self.animation {
            animation.transform(m);
        }
        self.refresh(scene, style)
    }

    fn set_highlight<S: SceneAdapter>(&self, scene: &mut S, color: Option<Color>) -> Result<()> {
        if self.is_group() {
            // Containers carry no paint; the dashed border marks a selected group.
            return Ok(());
        }
        let mut style: Style = scene.style(self.node)?.clone();
        style.highlight = color;
        scene.set_style(self.node, style)?;
        Ok(())
    }
}

/// Whether `m` preserves distances and angles.
fn is_rigid(m: &Affine) -> bool {
    const EPS: f64 = 1e-9;
    let [a, b, c, d, _, _] = m.coefficients();
    (a * a + b * b - 1.0).abs() < EPS
        && (c * c + d * d - 1.0).abs() < EPS
        && (a * c + b * d).abs() < EPS
}
