use std::collections::HashMap;

use lyon::algorithms::hit_test::hit_test_path;
use lyon::math::point;
use lyon::path::{FillRule, Path};
use tracing::debug;

use super::shape::distance_to_outline;
use super::{Geometry, Layer, NodeId, SceneAdapter, Style};
use crate::constants::FLATTENING_TOLERANCE;
use crate::error::{Result, SceneError};
use crate::geometry::{Affine, Bounds, Point};

#[derive(Debug, Clone)]
struct Node {
    geometry: Geometry,
    style: Style,
    matrix: Affine,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(geometry: Geometry, style: Style) -> Self {
        Self {
            geometry,
            style,
            matrix: Affine::identity(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// In-memory scene graph with three stacked layers.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    layers: [NodeId; 3],
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: HashMap::new(),
            layers: [NodeId(0); 3],
            next_id: 0,
        };
        for layer in Layer::ALL {
            let id = scene.allocate(Node::new(Geometry::Container, Style::default()));
            scene.layers[layer.slot()] = id;
        }
        scene
    }

    /// Number of live nodes, layer roots excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))
    }

    fn is_layer_root(&self, id: NodeId) -> bool {
        self.layers.contains(&id)
    }

    fn container(&self, id: NodeId) -> Result<&Node> {
        let node = self.node(id)?;
        if !node.geometry.is_container() {
            return Err(SceneError::NotAContainer(id));
        }
        Ok(node)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes.get(&node).and_then(|n| n.parent);
        }
        false
    }

    /// Removes the node from its parent's child list, if any.
    fn unlink(&mut self, id: NodeId) -> Result<Option<(NodeId, usize)>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|&child| child == id)
            .ok_or(SceneError::UnknownNode(id))?;
        siblings.remove(index);
        self.node_mut(id)?.parent = None;
        Ok(Some((parent, index)))
    }

    fn link(&mut self, id: NodeId, parent: NodeId, index: usize) -> Result<()> {
        let len = self.container(parent)?.children.len();
        if index > len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }
        self.node_mut(parent)?.children.insert(index, id);
        self.node_mut(id)?.parent = Some(parent);
        Ok(())
    }

    fn copy_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.node(id)?.clone();
        let mut copy = Node::new(source.geometry, source.style);
        copy.matrix = source.matrix;
        let copy_id = self.allocate(copy);
        for child in source.children {
            let child_copy = self.copy_subtree(child)?;
            self.node_mut(copy_id)?.children.push(child_copy);
            self.node_mut(child_copy)?.parent = Some(copy_id);
        }
        Ok(copy_id)
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn world_bounds(&self, id: NodeId, parent_world: &Affine) -> Result<Option<Bounds>> {
        let node = self.node(id)?;
        if !node.geometry.is_container() {
            return Ok(node.geometry.transformed(parent_world).bounds());
        }
        let world = node.matrix.then(parent_world);
        let mut united: Option<Bounds> = None;
        for &child in &node.children {
            if let Some(b) = self.world_bounds(child, &world)? {
                united = Some(match united {
                    Some(u) => self.unite(&u, &b),
                    None => b,
                });
            }
        }
        Ok(united)
    }

    fn hit_node(&self, id: NodeId, parent_world: &Affine, p: Point, tolerance: f64) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        if !node.style.visible {
            return None;
        }
        if node.geometry.is_container() {
            let world = node.matrix.then(parent_world);
            return node
                .children
                .iter()
                .rev()
                .find_map(|&child| self.hit_node(child, &world, p, tolerance));
        }
        if !node.style.hit_testable {
            return None;
        }
        let path = node.geometry.to_path()?.transformed(&parent_world.to_lyon());
        let inside = node.style.fill.is_some()
            && node.geometry.is_closed()
            && hit_test_path(
                &point(p.x as f32, p.y as f32),
                path.iter(),
                FillRule::NonZero,
                FLATTENING_TOLERANCE,
            );
        let reach = node.style.stroke_width / 2.0 + tolerance;
        if inside || distance_to_outline(&path, p) <= reach {
            Some(id)
        } else {
            None
        }
    }
}

impl SceneAdapter for Scene {
    fn layer(&self, layer: Layer) -> NodeId {
        self.layers[layer.slot()]
    }

    fn create_shape(&mut self, parent: NodeId, geometry: Geometry, style: Style) -> Result<NodeId> {
        let index = self.container(parent)?.children.len();
        let id = self.allocate(Node::new(geometry, style));
        self.link(id, parent, index)?;
        debug!("Created shape {} in {}", id, parent);
        Ok(id)
    }

    fn create_container(&mut self, parent: NodeId, children: &[NodeId]) -> Result<NodeId> {
        let siblings = &self.container(parent)?.children;
        let index = children
            .iter()
            .filter_map(|child| siblings.iter().position(|s| s == child))
            .max()
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        for &child in children {
            self.node(child)?;
            if self.is_layer_root(child) {
                return Err(SceneError::LayerRoot(child));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::Cycle {
                    node: child,
                    parent,
                });
            }
        }

        let id = self.allocate(Node::new(Geometry::Container, Style::default()));
        self.link(id, parent, index)?;
        for &child in children {
            self.unlink(child)?;
            let len = self.node(id)?.children.len();
            self.link(child, id, len)?;
        }
        debug!("Created container {} with {} children", id, children.len());
        Ok(id)
    }

    fn clone_node(&mut self, id: NodeId) -> Result<NodeId> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        let copy = self.copy_subtree(id)?;
        if self.node(id)?.parent.is_some() {
            self.insert_above(copy, id)?;
        }
        debug!("Cloned {} into {}", id, copy);
        Ok(copy)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if self.is_layer_root(current) {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn geometry(&self, id: NodeId) -> Result<&Geometry> {
        Ok(&self.node(id)?.geometry)
    }

    fn set_geometry(&mut self, id: NodeId, geometry: Geometry) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.geometry.is_container() != geometry.is_container() {
            return Err(SceneError::NotAContainer(id));
        }
        node.geometry = geometry;
        Ok(())
    }

    fn style(&self, id: NodeId) -> Result<&Style> {
        Ok(&self.node(id)?.style)
    }

    fn set_style(&mut self, id: NodeId, style: Style) -> Result<()> {
        self.node_mut(id)?.style = style;
        Ok(())
    }

    fn matrix(&self, id: NodeId) -> Result<Affine> {
        Ok(self.node(id)?.matrix)
    }

    fn set_matrix(&mut self, id: NodeId, matrix: Affine) -> Result<()> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        let node = self.node_mut(id)?;
        if !node.geometry.is_container() {
            return Err(SceneError::NotAContainer(id));
        }
        node.matrix = matrix;
        Ok(())
    }

    fn parent_matrix(&self, id: NodeId) -> Result<Affine> {
        let mut acc = Affine::identity();
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            let node = self.node(parent)?;
            acc = acc.then(&node.matrix);
            current = node.parent;
        }
        Ok(acc)
    }

    fn bounds(&self, id: NodeId) -> Result<Bounds> {
        let parent_world = self.parent_matrix(id)?;
        match self.world_bounds(id, &parent_world)? {
            Some(bounds) => Ok(bounds),
            None => {
                let origin = self.node(id)?.matrix.then(&parent_world).apply(Point::ZERO);
                Ok(Bounds::new(origin.x, origin.y, origin.x, origin.y))
            }
        }
    }

    fn transform(&mut self, id: NodeId, m: &Affine) -> Result<()> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        let node = self.node_mut(id)?;
        if node.geometry.is_container() {
            node.matrix = node.matrix.then(m);
        } else {
            node.geometry.transform(m);
        }
        Ok(())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> Option<NodeId> {
        [Layer::Overlay, Layer::Drawing]
            .into_iter()
            .find_map(|layer| self.hit_node(self.layer(layer), &Affine::identity(), point, tolerance))
    }

    fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    fn index_of(&self, id: NodeId) -> Result<usize> {
        let parent = self.node(id)?.parent.ok_or(SceneError::Detached(id))?;
        self.node(parent)?
            .children
            .iter()
            .position(|&child| child == id)
            .ok_or(SceneError::UnknownNode(id))
    }

    fn bring_to_front(&mut self, id: NodeId) -> Result<()> {
        let (parent, _) = self.unlink(id)?.ok_or(SceneError::Detached(id))?;
        let len = self.node(parent)?.children.len();
        self.link(id, parent, len)
    }

    fn send_to_back(&mut self, id: NodeId) -> Result<()> {
        let (parent, _) = self.unlink(id)?.ok_or(SceneError::Detached(id))?;
        self.link(id, parent, 0)
    }

    fn insert_at(&mut self, id: NodeId, parent: NodeId, index: usize) -> Result<()> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        self.container(parent)?;
        if self.is_ancestor_or_self(id, parent) {
            return Err(SceneError::Cycle { node: id, parent });
        }
        let len = self.node(parent)?.children.len();
        let len = if self.node(id)?.parent == Some(parent) {
            len - 1
        } else {
            len
        };
        if index > len {
            return Err(SceneError::IndexOutOfRange { index, len });
        }
        self.unlink(id)?;
        self.link(id, parent, index)
    }

    fn detach(&mut self, id: NodeId) -> Result<(NodeId, usize)> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        let slot = self.unlink(id)?.ok_or(SceneError::Detached(id))?;
        debug!("Detached {} from {} at {}", id, slot.0, slot.1);
        Ok(slot)
    }

    fn remove(&mut self, id: NodeId) -> Result<()> {
        if self.is_layer_root(id) {
            return Err(SceneError::LayerRoot(id));
        }
        self.unlink(id)?;
        self.drop_subtree(id);
        debug!("Removed {}", id);
        Ok(())
    }

    fn path(&self, id: NodeId) -> Result<Option<Path>> {
        let parent_world = self.parent_matrix(id)?;
        Ok(self
            .node(id)?
            .geometry
            .to_path()
            .map(|path| path.transformed(&parent_world.to_lyon())))
    }
}
