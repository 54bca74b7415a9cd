use crate::artefact::ArtefactId;

/// Tracks which top-level artefacts are selected.
///
/// `SelectionManager` only records membership; the canvas builds and tears
/// down the overlays.
///
/// # Selection Model
///
/// - **Order**: ids are kept in the order they were selected
/// - **Primary Selection**: the most recently selected id
/// - **Uniqueness**: selecting an id twice has no effect
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<ArtefactId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawkit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.primary(), None);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently selected id.
    pub fn primary(&self) -> Option<ArtefactId> {
        self.selected.last().copied()
    }

    pub fn ids(&self) -> &[ArtefactId] {
        &self.selected
    }

    pub fn contains(&self, id: ArtefactId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Adds `id`. Returns `false` when it was already selected.
    pub fn add(&mut self, id: ArtefactId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Removes `id`. Returns `false` when it was not selected.
    pub fn remove(&mut self, id: ArtefactId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| *s != id);
        self.selected.len() != before
    }

    /// Clears the selection and returns what was selected.
    pub fn take(&mut self) -> Vec<ArtefactId> {
        std::mem::take(&mut self.selected)
    }
}
