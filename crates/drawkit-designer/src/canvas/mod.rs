//! Canvas holding the scene and the artefacts drawn on it.

mod animation;
mod operations;
mod types;

pub use types::{Detached, HitTarget, ShapeState, Ungrouped};

use drawkit_core::{
    Affine, Bounds, Color, Geometry, Layer, NodeId, Point, Scene, SceneAdapter, SceneError, Style,
};
use drawkit_settings::{AnimationSettings, Settings};
use tracing::debug;

use crate::artefact::{Artefact, ArtefactId, ArtefactKind};
use crate::error::{DesignerError, Result};
use crate::overlay::OverlayStyle;
use crate::registry::ArtefactRegistry;
use crate::selection_manager::SelectionManager;

/// Canvas state managing artefacts, selection and their scene nodes.
#[derive(Debug, Clone)]
pub struct Canvas<S: SceneAdapter = Scene> {
    pub(crate) scene: S,
    pub(crate) registry: ArtefactRegistry,
    pub(crate) selection_manager: SelectionManager,
    style: OverlayStyle,
    min_size: f64,
    hit_tolerance: f64,
    animation_defaults: AnimationSettings,
}

impl Default for Canvas<Scene> {
    fn default() -> Self {
        Self::new(Scene::new(), &Settings::default())
    }
}

impl<S: SceneAdapter> Canvas<S> {
    /// Creates a canvas over `scene`.
    pub fn new(scene: S, settings: &Settings) -> Self {
        Self {
            scene,
            registry: ArtefactRegistry::new(),
            selection_manager: SelectionManager::new(),
            style: OverlayStyle::from_settings(settings),
            min_size: settings.canvas.min_size,
            hit_tolerance: settings.canvas.hit_tolerance,
            animation_defaults: settings.animation.clone(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn overlay_style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance
    }

    pub fn artefact(&self, id: ArtefactId) -> Result<&Artefact> {
        self.registry.get(id)
    }

    /// Number of live artefacts, group members included.
    pub fn artefact_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_destroyed(&self, id: ArtefactId) -> bool {
        self.registry.is_destroyed(id)
    }

    /// Creates a filled rectangle on top of the drawing layer.
    pub fn draw_rectangle(&mut self, bounds: &Bounds, fill: Color) -> Result<ArtefactId> {
        self.create_leaf(ArtefactKind::Rectangle, Geometry::rectangle(bounds), fill)
    }

    /// Creates a filled circle on top of the drawing layer.
    pub fn draw_circle(&mut self, center: Point, radius: f64, fill: Color) -> Result<ArtefactId> {
        self.create_leaf(ArtefactKind::Circle, Geometry::circle(center, radius), fill)
    }

    fn create_leaf(&mut self, kind: ArtefactKind, shape: Geometry, fill: Color) -> Result<ArtefactId> {
        let layer = self.scene.layer(Layer::Drawing);
        let node = self.scene.create_shape(layer, shape.clone(), Style::filled(fill))?;
        let id = self.registry.generate_id();
        self.registry.insert(Artefact::leaf(id, kind, node, shape));
        debug!("Created {} {}", kind, id);
        Ok(id)
    }

    /// Top-level artefacts in draw order, bottom first.
    pub fn top_level(&self) -> Vec<ArtefactId> {
        let layer = self.scene.layer(Layer::Drawing);
        self.scene
            .children(layer)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter_map(|node| self.registry.by_node(*node))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The outermost group containing `id`, or `id` itself.
    pub fn top_level_of(&self, id: ArtefactId) -> Result<ArtefactId> {
        let mut current = self.registry.get(id)?;
        while let Some(parent) = current.parent {
            current = self.registry.get(parent)?;
        }
        Ok(current.id)
    }

    pub(crate) fn require_top_level(&self, id: ArtefactId) -> Result<&Artefact> {
        let artefact = self.registry.get(id)?;
        if artefact.parent.is_some() {
            return Err(DesignerError::NotTopLevel(id));
        }
        Ok(artefact)
    }

    /// `id` followed by all its descendants, depth first.
    pub(crate) fn subtree(&self, id: ArtefactId) -> Result<Vec<ArtefactId>> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            let children = self.registry.get(out[i])?.children.clone();
            out.extend(children);
            i += 1;
        }
        Ok(out)
    }

    // Selection

    /// Selects a top-level artefact. Returns `false` when already selected.
    pub fn select(&mut self, id: ArtefactId) -> Result<bool> {
        self.require_top_level(id)?;
        let changed = self
            .registry
            .get_mut(id)?
            .select(&mut self.scene, &self.style)?;
        self.selection_manager.add(id);
        Ok(changed)
    }

    /// Returns `false` when `id` was not selected.
    pub fn deselect(&mut self, id: ArtefactId) -> Result<bool> {
        let changed = self.registry.get_mut(id)?.deselect(&mut self.scene)?;
        self.selection_manager.remove(id);
        Ok(changed)
    }

    /// Flips membership of `id`, returning whether it ends up selected.
    pub fn toggle(&mut self, id: ArtefactId) -> Result<bool> {
        if self.selection_manager.contains(id) {
            self.deselect(id)?;
            Ok(false)
        } else {
            self.select(id)?;
            Ok(true)
        }
    }

    pub fn deselect_all(&mut self) -> Result<()> {
        for id in self.selection_manager.take() {
            if self.registry.contains(id) {
                self.registry.get_mut(id)?.deselect(&mut self.scene)?;
            }
        }
        Ok(())
    }

    /// Replaces the selection with `ids`.
    pub fn select_only(&mut self, ids: &[ArtefactId]) -> Result<()> {
        for id in ids {
            self.require_top_level(*id)?;
        }
        let stale: Vec<ArtefactId> = self
            .selection_manager
            .ids()
            .iter()
            .copied()
            .filter(|id| !ids.contains(id))
            .collect();
        for id in stale {
            self.deselect(id)?;
        }
        for id in ids {
            self.select(*id)?;
        }
        Ok(())
    }

    /// Selected artefacts in draw order.
    pub fn selected(&self) -> Vec<ArtefactId> {
        self.top_level()
            .into_iter()
            .filter(|id| self.selection_manager.contains(*id))
            .collect()
    }

    pub fn is_selected(&self, id: ArtefactId) -> bool {
        self.selection_manager.contains(id)
    }

    /// Top-level artefacts whose world bounds intersect `area`.
    pub fn artefacts_in(&self, area: &Bounds) -> Result<Vec<ArtefactId>> {
        let mut hits = Vec::new();
        for id in self.top_level() {
            if self.world_shadow_bounds(id)?.intersects(area) {
                hits.push(id);
            }
        }
        Ok(hits)
    }

    // Queries

    /// Hit-tests `point` (world space) against handles and artefacts.
    pub fn hit(&self, point: Point) -> Result<HitTarget> {
        let Some(node) = self.scene.hit_test(point, self.hit_tolerance) else {
            return Ok(HitTarget::None);
        };
        for owner in self.selection_manager.ids() {
            let artefact = self.registry.get(*owner)?;
            if let Some(handle) = artefact.overlay.as_ref().and_then(|o| o.handle_at(node)) {
                return Ok(HitTarget::ResizeHandle {
                    owner: *owner,
                    role: handle.role,
                });
            }
            if artefact.animation.as_ref().is_some_and(|a| a.owns_handle(node)) {
                return Ok(HitTarget::AnimationHandle { owner: *owner });
            }
        }
        match self.registry.by_node(node) {
            Some(id) => Ok(HitTarget::Artefact(self.top_level_of(id)?)),
            None => Ok(HitTarget::None),
        }
    }

    /// Shadow bounds in the artefact's parent space.
    ///
    /// For groups, `depth` levels of children are united and re-projected by
    /// the group's rest matrix; depth 0 returns the cached group shadow.
    pub fn shadow_bounds(&self, id: ArtefactId, depth: usize) -> Result<Bounds> {
        let artefact = self.registry.get(id)?;
        if !artefact.is_group() || depth == 0 {
            return Ok(artefact.cached_shadow_bounds());
        }
        let united = self.children_bounds(artefact, depth - 1)?;
        let rest = self.rest_matrix(id)?;
        Ok(Geometry::rectangle(&united)
            .transformed(&rest)
            .bounds()
            .unwrap_or(united))
    }

    /// Shadow bounds in world space.
    pub fn world_shadow_bounds(&self, id: ArtefactId) -> Result<Bounds> {
        let artefact = self.registry.get(id)?;
        let to_world = self.scene.parent_matrix(artefact.node)?;
        Ok(artefact
            .shadow
            .transformed(&to_world)
            .bounds()
            .unwrap_or_else(|| artefact.cached_shadow_bounds()))
    }

    fn children_bounds(&self, group: &Artefact, depth: usize) -> Result<Bounds> {
        let mut united: Option<Bounds> = None;
        for child in &group.children {
            let bounds = self.shadow_bounds(*child, depth)?;
            united = Some(match united {
                Some(acc) => self.scene.unite(&acc, &bounds),
                None => bounds,
            });
        }
        Ok(united.unwrap_or_else(|| group.cached_shadow_bounds()))
    }

    /// Container matrix with any animation pose taken out.
    pub(crate) fn rest_matrix(&self, id: ArtefactId) -> Result<Affine> {
        let artefact = self.registry.get(id)?;
        let matrix = self.scene.matrix(artefact.node)?;
        let applied = artefact
            .animation
            .as_ref()
            .map(|a| a.applied())
            .unwrap_or_else(Affine::identity);
        let inverse = applied.inverse().ok_or(SceneError::NonInvertible)?;
        Ok(matrix.then(&inverse))
    }

    /// Recomputes a group's shadow from its children.
    pub(crate) fn group_shadow(&self, id: ArtefactId) -> Result<Geometry> {
        let artefact = self.registry.get(id)?;
        let united = self.children_bounds(artefact, 0)?;
        Ok(Geometry::rectangle(&united).transformed(&self.rest_matrix(id)?))
    }

    pub(crate) fn node_of(&self, id: ArtefactId) -> Result<NodeId> {
        Ok(self.registry.get(id)?.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::default()
    }

    fn fill() -> Color {
        Color::rgb(0.2, 0.3, 0.9)
    }

    #[test]
    fn test_draw_rectangle_registers_artefact() {
        let mut canvas = canvas();
        let id = canvas
            .draw_rectangle(&Bounds::from_rect(20.0, 30.0, 100.0, 140.0), fill())
            .unwrap();
        assert_eq!(canvas.artefact_count(), 1);
        assert_eq!(canvas.top_level(), vec![id]);
        assert_eq!(
            canvas.shadow_bounds(id, 1).unwrap(),
            Bounds::new(20.0, 30.0, 120.0, 170.0)
        );
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut canvas = canvas();
        let id = canvas
            .draw_circle(Point::new(50.0, 50.0), 10.0, fill())
            .unwrap();
        assert!(canvas.select(id).unwrap());
        let nodes = canvas.scene().len();
        assert!(!canvas.select(id).unwrap());
        assert_eq!(canvas.scene().len(), nodes);
        assert!(canvas.artefact(id).unwrap().overlay().is_some());

        assert!(canvas.deselect(id).unwrap());
        assert!(!canvas.deselect(id).unwrap());
        assert!(canvas.artefact(id).unwrap().overlay().is_none());
        assert_eq!(canvas.scene().len(), 1);
    }

    #[test]
    fn test_hit_resolves_handles_then_artefacts() {
        let mut canvas = canvas();
        let id = canvas
            .draw_rectangle(&Bounds::from_rect(20.0, 30.0, 100.0, 140.0), fill())
            .unwrap();
        assert_eq!(canvas.hit(Point::new(60.0, 60.0)).unwrap(), HitTarget::Artefact(id));
        assert_eq!(canvas.hit(Point::new(500.0, 500.0)).unwrap(), HitTarget::None);

        canvas.select(id).unwrap();
        match canvas.hit(Point::new(132.0, 182.0)).unwrap() {
            HitTarget::ResizeHandle { owner, role } => {
                assert_eq!(owner, id);
                assert_eq!(role.to_string(), "bottom-right");
            }
            other => panic!("expected a resize handle, got {:?}", other),
        }
    }

    #[test]
    fn test_select_only_replaces_selection() {
        let mut canvas = canvas();
        let a = canvas
            .draw_rectangle(&Bounds::from_rect(0.0, 0.0, 10.0, 10.0), fill())
            .unwrap();
        let b = canvas
            .draw_rectangle(&Bounds::from_rect(20.0, 0.0, 10.0, 10.0), fill())
            .unwrap();
        canvas.select(a).unwrap();
        canvas.select_only(&[b]).unwrap();
        assert_eq!(canvas.selected(), vec![b]);
        assert!(!canvas.artefact(a).unwrap().is_selected());
    }

    #[test]
    fn test_artefacts_in_area() {
        let mut canvas = canvas();
        let a = canvas
            .draw_rectangle(&Bounds::from_rect(0.0, 0.0, 10.0, 10.0), fill())
            .unwrap();
        canvas
            .draw_rectangle(&Bounds::from_rect(100.0, 100.0, 10.0, 10.0), fill())
            .unwrap();
        let hits = canvas
            .artefacts_in(&Bounds::new(-5.0, -5.0, 5.0, 5.0))
            .unwrap();
        assert_eq!(hits, vec![a]);
    }
}
