//! Named actions the shell can invoke on a set of artefacts.

use std::collections::BTreeMap;
use std::fmt;

use drawkit_core::SceneAdapter;

use crate::animation::AnimationKind;
use crate::artefact::ArtefactId;
use crate::error::{DesignerError, Result};
use crate::session::Session;

/// Signature of an action body.
pub type Action<S> = fn(&mut Session<S>, &[ArtefactId]) -> Result<()>;

/// Actions by name. The built-in set is registered on construction.
pub struct ActionRegistry<S: SceneAdapter> {
    actions: BTreeMap<String, Action<S>>,
}

impl<S: SceneAdapter> Default for ActionRegistry<S> {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("delete", |s, ids| s.delete(ids));
        registry.register("group", |s, ids| s.group(ids).map(|_| ()));
        registry.register("ungroup", |s, ids| s.ungroup(ids));
        registry.register("clone", |s, ids| s.clone_artefacts(ids).map(|_| ()));
        registry.register("bring-to-front", |s, ids| s.bring_to_front(ids));
        registry.register("send-to-back", |s, ids| s.send_to_back(ids));
        registry.register("recolor", |s, ids| s.recolor(ids));
        registry.register("animate-rotate", |s, ids| {
            s.animate(ids, AnimationKind::Rotate)
        });
        registry.register("animate-bounce", |s, ids| {
            s.animate(ids, AnimationKind::Bounce)
        });
        registry.register("start-animation", |s, ids| {
            s.start_animations(ids).map(|_| ())
        });
        registry.register("pause-animation", |s, ids| {
            s.pause_animations(ids).map(|_| ())
        });
        registry.register("stop-animation", |s, ids| s.stop_animations(ids).map(|_| ()));
        registry.register("remove-animation", |s, ids| s.remove_animations(ids));
        registry.register("toggle-playback", |s, ids| s.toggle_playback(ids));
        registry.register("select-all", |s, _| s.select_all());
        registry.register("deselect-all", |s, _| s.deselect_all());
        registry
    }
}

impl<S: SceneAdapter> ActionRegistry<S> {
    /// A registry without the built-in actions.
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Registers `action`, replacing any previous one under `name`.
    pub fn register(&mut self, name: &str, action: Action<S>) {
        self.actions.insert(name.to_string(), action);
    }

    pub fn get(&self, name: &str) -> Result<Action<S>> {
        self.actions
            .get(name)
            .copied()
            .ok_or_else(|| DesignerError::UnknownAction(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S: SceneAdapter> fmt::Debug for ActionRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use drawkit_core::{Point, PointerEvent, Scene};

    use super::*;

    #[test]
    fn test_builtin_actions() {
        let registry: ActionRegistry<Scene> = ActionRegistry::default();
        for name in ["delete", "group", "ungroup", "clone", "animate-rotate", "select-all"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(matches!(
            registry.get("explode"),
            Err(DesignerError::UnknownAction(name)) if name == "explode"
        ));
        assert!(ActionRegistry::<Scene>::empty().is_empty());
    }

    #[test]
    fn test_custom_action_runs_on_selection() {
        let mut session = Session::default();
        session.activate_tool("rectangle").unwrap();
        let down = Point::new(0.0, 0.0);
        let up = Point::new(30.0, 30.0);
        session.pointer_down(&PointerEvent::down(down)).unwrap();
        session.pointer_up(&PointerEvent::moved(down, down, up)).unwrap();

        session
            .actions_mut()
            .register("clear", |s, ids| s.delete(ids));
        session.invoke_action("clear").unwrap();
        assert!(session.canvas().top_level().is_empty());
        assert_eq!(session.undo_description(), Some("Delete"));
        assert!(session.invoke_action("missing").is_err());
    }
}
