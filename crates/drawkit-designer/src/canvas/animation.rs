//! Animation lifecycle on the canvas and the per-frame tick.

use drawkit_core::{FrameEvent, SceneAdapter, SceneError};
use tracing::trace;

use super::Canvas;
use crate::animation::{
    Animation, AnimationKind, AnimationSnapshot, AnimationState, AnimationUpdate,
};
use crate::artefact::ArtefactId;
use crate::error::Result;

impl<S: SceneAdapter> Canvas<S> {
    /// Attaches a fresh idle animation of `kind` seeded from the rest
    /// bounds, stopping and replacing any prior one.
    pub fn animate(&mut self, id: ArtefactId, kind: AnimationKind) -> Result<()> {
        self.remove_animation(id)?;
        let rest = self.registry.get(id)?.cached_shadow_bounds();
        let animation = Animation::init(kind, &rest, &self.animation_defaults);
        self.attach_animation(id, animation)
    }

    /// Rebuilds the animation from a snapshot, or removes it for `None`.
    pub fn set_animation(
        &mut self,
        id: ArtefactId,
        snapshot: Option<&AnimationSnapshot>,
    ) -> Result<()> {
        self.remove_animation(id)?;
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let mut animation = Animation::new(snapshot.properties.clone());
        if snapshot.running {
            animation.start();
        }
        self.attach_animation(id, animation)
    }

    /// Brings the animation to `snapshot`. A snapshot of the current kind
    /// updates the properties in place, then starts or stops the animation
    /// to match `snapshot.running`. A paused animation stays paused when the
    /// snapshot is not running.
    pub fn apply_animation(
        &mut self,
        id: ArtefactId,
        snapshot: Option<&AnimationSnapshot>,
    ) -> Result<()> {
        let artefact = self.registry.get_mut(id)?;
        let same_kind = matches!(
            (snapshot, &artefact.animation),
            (Some(s), Some(a)) if s.kind() == a.kind()
        );
        let Some(snapshot) = snapshot.filter(|_| same_kind) else {
            return self.set_animation(id, snapshot);
        };
        let to_world = self.scene.parent_matrix(artefact.node)?;
        if let Some((animation, target)) = artefact.animation_parts(&mut self.scene) {
            animation.set_properties(target, &snapshot.properties)?;
        }
        if artefact.selected {
            if let Some(animation) = &mut artefact.animation {
                animation.draw_handles(&mut self.scene, &to_world, &self.style)?;
            }
        }
        let active = artefact
            .animation
            .as_ref()
            .is_some_and(|a| a.state() == AnimationState::Active);
        if snapshot.running && !active {
            self.start_animation(id)?;
        } else if !snapshot.running && active {
            self.stop_animation(id)?;
        }
        Ok(())
    }

    fn attach_animation(&mut self, id: ArtefactId, animation: Animation) -> Result<()> {
        let artefact = self.registry.get_mut(id)?;
        let to_world = self.scene.parent_matrix(artefact.node)?;
        let animation = artefact.animation.insert(animation);
        if artefact.selected {
            animation.draw_handles(&mut self.scene, &to_world, &self.style)?;
        }
        Ok(())
    }

    /// Returns whether the animation changed state.
    pub fn start_animation(&mut self, id: ArtefactId) -> Result<bool> {
        Ok(self
            .registry
            .get_mut(id)?
            .animation
            .as_mut()
            .is_some_and(Animation::start))
    }

    /// Returns whether the animation changed state.
    pub fn pause_animation(&mut self, id: ArtefactId) -> Result<bool> {
        Ok(self
            .registry
            .get_mut(id)?
            .animation
            .as_mut()
            .is_some_and(Animation::pause))
    }

    /// Returns the geometry to rest. Returns whether the animation was
    /// running.
    pub fn stop_animation(&mut self, id: ArtefactId) -> Result<bool> {
        let artefact = self.registry.get_mut(id)?;
        let Some((animation, target)) = artefact.animation_parts(&mut self.scene) else {
            return Ok(false);
        };
        let was_running = animation.is_running();
        animation.stop(target)?;
        if was_running {
            artefact.refresh(&mut self.scene, &self.style)?;
        }
        Ok(was_running)
    }

    /// Stops and drops the animation, returning what it was.
    pub fn remove_animation(&mut self, id: ArtefactId) -> Result<Option<AnimationSnapshot>> {
        let artefact = self.registry.get_mut(id)?;
        let Some((animation, target)) = artefact.animation_parts(&mut self.scene) else {
            return Ok(None);
        };
        let snapshot = animation.snapshot();
        animation.stop(target)?;
        if let Some(mut animation) = artefact.animation.take() {
            animation.clear_handles(&mut self.scene)?;
        }
        Ok(Some(snapshot))
    }

    /// Feeds a handle drag or raw properties to the animation and redraws
    /// its handles. Returns `false` when there is no animation.
    pub fn update_animation(
        &mut self,
        id: ArtefactId,
        update: &AnimationUpdate,
    ) -> Result<bool> {
        let artefact = self.registry.get_mut(id)?;
        let to_world = self.scene.parent_matrix(artefact.node)?;
        let to_parent = to_world.inverse().ok_or(SceneError::NonInvertible)?;
        let Some((animation, target)) = artefact.animation_parts(&mut self.scene) else {
            return Ok(false);
        };
        animation.update(target, update, &to_parent)?;
        if artefact.selected {
            if let Some(animation) = &mut artefact.animation {
                animation.draw_handles(&mut self.scene, &to_world, &self.style)?;
            }
        }
        Ok(true)
    }

    pub fn animation_snapshot(&self, id: ArtefactId) -> Result<Option<AnimationSnapshot>> {
        Ok(self.registry.get(id)?.animation.as_ref().map(Animation::snapshot))
    }

    /// Advances every active animation, group members included. Returns how
    /// many moved.
    pub fn tick(&mut self, frame: &FrameEvent) -> Result<usize> {
        let active: Vec<ArtefactId> = self
            .registry
            .iter()
            .filter(|a| {
                a.animation
                    .as_ref()
                    .is_some_and(|animation| animation.state() == AnimationState::Active)
            })
            .map(|a| a.id)
            .collect();
        let mut advanced = 0;
        for id in active {
            let artefact = self.registry.get_mut(id)?;
            if let Some((animation, target)) = artefact.animation_parts(&mut self.scene) {
                if animation.frame(target, frame)? {
                    advanced += 1;
                }
            }
        }
        trace!("Frame {} advanced {} animations", frame.count, advanced);
        Ok(advanced)
    }
}
