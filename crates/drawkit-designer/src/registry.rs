//! Artefact storage keyed by stable id.

use std::collections::{HashMap, HashSet};

use drawkit_core::NodeId;

use crate::artefact::{Artefact, ArtefactId};
use crate::error::{DesignerError, Result};

/// Owns every live artefact and remembers destroyed ids, so that stale
/// references fail loudly instead of resolving to something else.
#[derive(Debug, Clone, Default)]
pub struct ArtefactRegistry {
    artefacts: HashMap<ArtefactId, Artefact>,
    by_node: HashMap<NodeId, ArtefactId>,
    destroyed: HashSet<ArtefactId>,
    next_id: u64,
}

impl ArtefactRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn generate_id(&mut self) -> ArtefactId {
        let id = ArtefactId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, artefact: Artefact) {
        self.destroyed.remove(&artefact.id);
        self.by_node.insert(artefact.node, artefact.id);
        self.artefacts.insert(artefact.id, artefact);
    }

    /// Unregisters the artefact and marks its id destroyed.
    pub fn remove(&mut self, id: ArtefactId) -> Result<Artefact> {
        let artefact = self.artefacts.remove(&id).ok_or_else(|| self.missing(id))?;
        self.by_node.remove(&artefact.node);
        self.destroyed.insert(id);
        Ok(artefact)
    }

    pub fn get(&self, id: ArtefactId) -> Result<&Artefact> {
        self.artefacts.get(&id).ok_or_else(|| self.missing(id))
    }

    pub fn get_mut(&mut self, id: ArtefactId) -> Result<&mut Artefact> {
        if !self.artefacts.contains_key(&id) {
            return Err(self.missing(id));
        }
        self.artefacts.get_mut(&id).ok_or(DesignerError::UnknownArtefact(id))
    }

    pub fn contains(&self, id: ArtefactId) -> bool {
        self.artefacts.contains_key(&id)
    }

    pub fn is_destroyed(&self, id: ArtefactId) -> bool {
        self.destroyed.contains(&id)
    }

    pub fn by_node(&self, node: NodeId) -> Option<ArtefactId> {
        self.by_node.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.artefacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artefacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artefact> {
        self.artefacts.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ArtefactId> + '_ {
        self.artefacts.keys().copied()
    }

    fn missing(&self, id: ArtefactId) -> DesignerError {
        if self.destroyed.contains(&id) {
            DesignerError::Destroyed(id)
        } else {
            DesignerError::UnknownArtefact(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::ArtefactKind;
    use drawkit_core::{Bounds, Geometry};

    fn rect(registry: &mut ArtefactRegistry, node: u64) -> ArtefactId {
        let id = registry.generate_id();
        let shadow = Geometry::rectangle(&Bounds::from_rect(0.0, 0.0, 10.0, 10.0));
        registry.insert(Artefact::leaf(id, ArtefactKind::Rectangle, NodeId(node), shadow));
        id
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = ArtefactRegistry::new();
        assert_eq!(rect(&mut registry, 10), ArtefactId(1));
        assert_eq!(rect(&mut registry, 11), ArtefactId(2));
        assert_eq!(registry.by_node(NodeId(11)), Some(ArtefactId(2)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_destroyed_ids_are_reported() {
        let mut registry = ArtefactRegistry::new();
        let id = rect(&mut registry, 10);
        let artefact = registry.remove(id).unwrap();
        assert_eq!(registry.get(id).unwrap_err(), DesignerError::Destroyed(id));
        assert_eq!(
            registry.get(ArtefactId(99)).unwrap_err(),
            DesignerError::UnknownArtefact(ArtefactId(99))
        );
        assert_eq!(registry.by_node(NodeId(10)), None);

        registry.insert(artefact);
        assert!(registry.get(id).is_ok());
        assert!(!registry.is_destroyed(id));
    }
}
