//! Canvas operations: transforms, resize, destroy and restore, clone,
//! grouping, paint and draw order.

use drawkit_core::{
    Affine, Bounds, Color, Corner, Geometry, Layer, Point, PointerEvent, SceneAdapter, SceneError,
};
use tracing::{debug, warn};

use super::{Canvas, Detached, ShapeState, Ungrouped};
use crate::animation::{Animation, AnimationSnapshot};
use crate::artefact::{Artefact, ArtefactId, ArtefactKind};
use crate::error::{DesignerError, Result};
use crate::overlay::{handle_position, HandleRole};

impl<S: SceneAdapter> Canvas<S> {
    /// Applies `m` (parent space) to an artefact as one rigid unit.
    pub fn transform(&mut self, id: ArtefactId, m: &Affine) -> Result<()> {
        self.registry
            .get_mut(id)?
            .transform(&mut self.scene, m, &self.style)
    }

    pub fn move_by(&mut self, ids: &[ArtefactId], delta: Point) -> Result<()> {
        let m = Affine::translation(delta.x, delta.y);
        for id in ids {
            self.transform(*id, &m)?;
        }
        Ok(())
    }

    /// Resizes a top-level artefact from one of its handles.
    ///
    /// Rectangles follow `event.delta` on the dragged corner; circles and
    /// groups scale uniformly about their center. Returns `false` when nothing
    /// changed, including while the artefact is animating.
    pub fn manipulate(
        &mut self,
        id: ArtefactId,
        event: &PointerEvent,
        role: HandleRole,
    ) -> Result<bool> {
        let artefact = self.require_top_level(id)?;
        if artefact.is_animating() {
            warn!("Refusing to resize artefact {} while it is animating", id);
            return Ok(false);
        }
        let kind = artefact.kind;
        let bounds = artefact.cached_shadow_bounds();
        let foreign = DesignerError::ForeignHandle { artefact: id, role };
        if artefact.overlay.as_ref().is_some_and(|o| o.handle(role).is_none()) {
            return Err(foreign);
        }
        let Some(handle) = handle_position(kind, &bounds, role, self.style.margin) else {
            return Err(foreign);
        };
        let to_parent = self
            .scene
            .parent_matrix(artefact.node)?
            .inverse()
            .ok_or(SceneError::NonInvertible)?;

        match (kind, role) {
            (ArtefactKind::Rectangle, HandleRole::Corner(corner)) => {
                let delta = to_parent.apply_vector(event.delta);
                let resized = resize_corner(&bounds, corner, delta, self.min_size);
                if resized == bounds {
                    return Ok(false);
                }
                let m = map_bounds(&bounds, &resized);
                self.registry.get_mut(id)?.reshape(
                    &mut self.scene,
                    Geometry::rectangle(&resized),
                    &m,
                    &self.style,
                )?;
            }
            _ => {
                let center = bounds.center();
                let radius = handle.distance_to(&center);
                if radius <= 0.0 {
                    return Ok(false);
                }
                let cursor = to_parent.apply(event.point);
                let mut factor = cursor.distance_to(&center) / radius;
                let smallest = bounds.width().min(bounds.height());
                if smallest > 0.0 {
                    factor = factor.max(self.min_size / smallest);
                }
                if (factor - 1.0).abs() < 1e-12 {
                    return Ok(false);
                }
                self.transform(id, &Affine::scale_about(factor, center))?;
            }
        }
        debug!("Resized artefact {} from {}", id, role);
        Ok(true)
    }

    /// Captures the rest shape of a top-level artefact.
    pub fn shape_state(&self, id: ArtefactId) -> Result<ShapeState> {
        let artefact = self.require_top_level(id)?;
        let matrix = match artefact.kind {
            ArtefactKind::Group => Some(self.rest_matrix(id)?),
            _ => None,
        };
        Ok(ShapeState {
            shadow: artefact.shadow.clone(),
            matrix,
            animation: artefact.animation.as_ref().map(|a| a.properties().at_rest()),
        })
    }

    /// Puts back a rest shape captured by [`Canvas::shape_state`].
    pub fn set_shape_state(&mut self, id: ArtefactId, state: &ShapeState) -> Result<()> {
        self.require_top_level(id)?;
        let artefact = self.registry.get_mut(id)?;
        if let Some((animation, target)) = artefact.animation_parts(&mut self.scene) {
            animation.stop(target)?;
        }
        match state.matrix {
            Some(matrix) => self.scene.set_matrix(artefact.node, matrix)?,
            None => self.scene.set_geometry(artefact.node, state.shadow.clone())?,
        }
        artefact.shadow = state.shadow.clone();
        if let Some(properties) = &state.animation {
            if let Some((animation, target)) = artefact.animation_parts(&mut self.scene) {
                animation.set_properties(target, properties)?;
            }
        }
        artefact.refresh(&mut self.scene, &self.style)
    }

    /// Tears down a top-level artefact and unlinks its geometry.
    ///
    /// Decorations and animations go first; running animations are stopped
    /// and remembered so [`Canvas::restore`] can bring them back.
    pub fn destroy(&mut self, id: ArtefactId) -> Result<Detached> {
        self.require_top_level(id)?;
        self.deselect(id)?;
        let ids = self.subtree(id)?;
        let mut animations = Vec::new();
        for member in &ids {
            if let Some(snapshot) = self.remove_animation(*member)? {
                animations.push((*member, snapshot));
            }
        }
        let node = self.node_of(id)?;
        let (parent, index) = self.scene.detach(node)?;
        let artefacts = ids
            .iter()
            .map(|member| self.registry.remove(*member))
            .collect::<Result<Vec<_>>>()?;
        debug!("Destroyed artefact {} ({} members)", id, artefacts.len());
        Ok(Detached {
            root: id,
            artefacts,
            animations,
            parent,
            index,
        })
    }

    /// Reinserts destroyed geometry where it was and re-registers it.
    pub fn restore(&mut self, detached: Detached) -> Result<ArtefactId> {
        let Detached {
            root,
            artefacts,
            animations,
            parent,
            index,
        } = detached;
        let node = artefacts
            .first()
            .map(Artefact::node)
            .ok_or(DesignerError::UnknownArtefact(root))?;
        let len = self.scene.children(parent)?.len();
        self.scene.insert_at(node, parent, index.min(len))?;
        for artefact in artefacts {
            self.registry.insert(artefact);
        }
        for (member, snapshot) in animations {
            self.set_animation(member, Some(&snapshot))?;
        }
        debug!("Restored artefact {}", root);
        Ok(root)
    }

    /// Frees the geometry of an artefact that will never be restored.
    pub fn release(&mut self, detached: Detached) -> Result<()> {
        if let Some(node) = detached.node() {
            self.scene.remove(node)?;
            debug!("Released artefact {}", detached.root);
        }
        Ok(())
    }

    /// Duplicates a top-level artefact directly above the original.
    ///
    /// The copy is structurally independent. Animations are copied with their
    /// properties at rest and started.
    pub fn clone_artefact(&mut self, id: ArtefactId) -> Result<ArtefactId> {
        self.require_top_level(id)?;
        let copy = self.clone_subtree(id)?;
        debug!("Cloned artefact {} into {}", id, copy);
        Ok(copy)
    }

    fn clone_subtree(&mut self, id: ArtefactId) -> Result<ArtefactId> {
        let source = self.registry.get(id)?;
        let kind = source.kind;
        let source_node = source.node;
        let shadow = source.shadow.clone();
        let children = source.children.clone();
        let animation = source.animation.as_ref().map(Animation::snapshot);

        let copy_id = match kind {
            ArtefactKind::Group => {
                let mut copies = Vec::with_capacity(children.len());
                for child in &children {
                    copies.push(self.clone_subtree(*child)?);
                }
                let nodes = copies
                    .iter()
                    .map(|c| self.node_of(*c))
                    .collect::<Result<Vec<_>>>()?;
                let parent = self
                    .scene
                    .parent(source_node)?
                    .ok_or(SceneError::Detached(source_node))?;
                let container = self.scene.create_container(parent, &nodes)?;
                self.scene.insert_above(container, source_node)?;
                let rest = self.rest_matrix(id)?;
                self.scene.set_matrix(container, rest)?;

                let copy_id = self.registry.generate_id();
                for child in &copies {
                    self.registry.get_mut(*child)?.parent = Some(copy_id);
                }
                self.registry
                    .insert(Artefact::group(copy_id, container, shadow, copies));
                copy_id
            }
            _ => {
                let node = self.scene.clone_node(source_node)?;
                self.scene.set_geometry(node, shadow.clone())?;
                let mut style = self.scene.style(node)?.clone();
                style.highlight = None;
                self.scene.set_style(node, style)?;

                let copy_id = self.registry.generate_id();
                self.registry
                    .insert(Artefact::leaf(copy_id, kind, node, shadow));
                copy_id
            }
        };

        if let Some(snapshot) = animation {
            let snapshot = AnimationSnapshot {
                running: true,
                ..snapshot
            };
            self.set_animation(copy_id, Some(&snapshot))?;
        }
        Ok(copy_id)
    }

    /// Groups top-level artefacts into a new group above the topmost one.
    /// Returns `None` when fewer than two distinct artefacts are given.
    pub fn group(&mut self, ids: &[ArtefactId]) -> Result<Option<ArtefactId>> {
        for id in ids {
            self.require_top_level(*id)?;
        }
        let members: Vec<ArtefactId> = self
            .top_level()
            .into_iter()
            .filter(|id| ids.contains(id))
            .collect();
        if members.len() < 2 {
            return Ok(None);
        }
        let id = self.registry.generate_id();
        self.group_with(id, &members, Affine::identity(), None)?;
        Ok(Some(id))
    }

    /// Builds group `id` around `children`, whose geometry is currently in
    /// the drawing layer's space, with container matrix `matrix`.
    pub fn group_with(
        &mut self,
        id: ArtefactId,
        children: &[ArtefactId],
        matrix: Affine,
        animation: Option<&AnimationSnapshot>,
    ) -> Result<()> {
        let inverse = matrix.inverse().ok_or(SceneError::NonInvertible)?;
        let mut nodes = Vec::with_capacity(children.len());
        for child in children {
            self.require_top_level(*child)?;
            self.deselect(*child)?;
            self.transform(*child, &inverse)?;
            nodes.push(self.node_of(*child)?);
        }
        let layer = self.scene.layer(Layer::Drawing);
        let container = self.scene.create_container(layer, &nodes)?;
        self.scene.set_matrix(container, matrix)?;
        for child in children {
            self.registry.get_mut(*child)?.parent = Some(id);
        }
        let placeholder = Geometry::rectangle(&Bounds::new(0.0, 0.0, 0.0, 0.0));
        self.registry
            .insert(Artefact::group(id, container, placeholder, children.to_vec()));
        let shadow = self.group_shadow(id)?;
        self.registry.get_mut(id)?.shadow = shadow;
        if animation.is_some() {
            self.set_animation(id, animation)?;
        }
        debug!("Grouped {} artefacts into {}", children.len(), id);
        Ok(())
    }

    /// Dissolves a top-level group, moving its children into the group's
    /// place with the group matrix baked in.
    pub fn ungroup(&mut self, id: ArtefactId) -> Result<Ungrouped> {
        let group = self.require_top_level(id)?;
        if !group.is_group() {
            return Err(DesignerError::NotAGroup(id));
        }
        self.deselect(id)?;
        let animation = self.remove_animation(id)?;

        let group = self.registry.get(id)?;
        let container = group.node;
        let children = group.children.clone();
        let matrix = self.scene.matrix(container)?;
        let parent = self
            .scene
            .parent(container)?
            .ok_or(SceneError::Detached(container))?;
        let index = self.scene.index_of(container)?;

        for (offset, child) in children.iter().enumerate() {
            let node = self.node_of(*child)?;
            self.scene.insert_at(node, parent, index + offset)?;
            self.registry.get_mut(*child)?.parent = None;
            self.transform(*child, &matrix)?;
        }
        self.scene.remove(container)?;
        self.registry.remove(id)?;
        debug!("Ungrouped {} into {} artefacts", id, children.len());
        Ok(Ungrouped {
            children,
            matrix,
            animation,
        })
    }

    /// Dissolves group `id`, then returns each child to the draw-order slot
    /// it held before grouping. `slots` pairs with the group's children and
    /// is ascending.
    pub fn ungroup_to(&mut self, id: ArtefactId, slots: &[usize]) -> Result<Ungrouped> {
        let ungrouped = self.ungroup(id)?;
        for (child, slot) in ungrouped.children.iter().zip(slots) {
            let node = self.node_of(*child)?;
            let parent = self.scene.parent(node)?.ok_or(SceneError::Detached(node))?;
            let last = self.scene.children(parent)?.len().saturating_sub(1);
            self.scene.insert_at(node, parent, (*slot).min(last))?;
        }
        Ok(ungrouped)
    }

    /// Leaf artefacts under `id` with their current fill.
    pub fn fills(&self, id: ArtefactId) -> Result<Vec<(ArtefactId, Option<Color>)>> {
        let mut fills = Vec::new();
        for member in self.subtree(id)? {
            let artefact = self.registry.get(member)?;
            if !artefact.is_group() {
                fills.push((member, self.scene.style(artefact.node)?.fill));
            }
        }
        Ok(fills)
    }

    pub fn set_fill(&mut self, id: ArtefactId, fill: Option<Color>) -> Result<()> {
        let node = self.node_of(id)?;
        let mut style = self.scene.style(node)?.clone();
        style.fill = fill;
        self.scene.set_style(node, style)?;
        Ok(())
    }

    /// Paints every leaf under `id` with `color`.
    pub fn recolor(&mut self, id: ArtefactId, color: Color) -> Result<()> {
        for (leaf, _) in self.fills(id)? {
            self.set_fill(leaf, Some(color))?;
        }
        Ok(())
    }

    /// Position of a top-level artefact in draw order (0 = bottom).
    pub fn index_of(&self, id: ArtefactId) -> Result<usize> {
        let node = self.require_top_level(id)?.node;
        Ok(self.scene.index_of(node)?)
    }

    pub fn bring_to_front(&mut self, id: ArtefactId) -> Result<()> {
        let node = self.require_top_level(id)?.node;
        Ok(self.scene.bring_to_front(node)?)
    }

    pub fn send_to_back(&mut self, id: ArtefactId) -> Result<()> {
        let node = self.require_top_level(id)?.node;
        Ok(self.scene.send_to_back(node)?)
    }

    pub fn move_to_index(&mut self, id: ArtefactId, index: usize) -> Result<()> {
        let node = self.require_top_level(id)?.node;
        let parent = self.scene.parent(node)?.ok_or(SceneError::Detached(node))?;
        Ok(self.scene.insert_at(node, parent, index)?)
    }
}

/// Moves the sides meeting at `corner` by `delta`, freezing an axis that
/// would shrink below `min_size`.
fn resize_corner(bounds: &Bounds, corner: Corner, delta: Point, min_size: f64) -> Bounds {
    let mut resized = *bounds;
    if corner.is_right() {
        resized.max_x += delta.x;
    } else {
        resized.min_x += delta.x;
    }
    if corner.is_bottom() {
        resized.max_y += delta.y;
    } else {
        resized.min_y += delta.y;
    }
    if resized.width() < min_size {
        resized.min_x = bounds.min_x;
        resized.max_x = bounds.max_x;
    }
    if resized.height() < min_size {
        resized.min_y = bounds.min_y;
        resized.max_y = bounds.max_y;
    }
    resized
}

/// Axis-aligned map taking `from` onto `to`.
fn map_bounds(from: &Bounds, to: &Bounds) -> Affine {
    let sx = if from.width() > 0.0 { to.width() / from.width() } else { 1.0 };
    let sy = if from.height() > 0.0 { to.height() / from.height() } else { 1.0 };
    Affine::new(
        sx,
        0.0,
        0.0,
        sy,
        to.min_x - from.min_x * sx,
        to.min_y - from.min_y * sy,
    )
}
