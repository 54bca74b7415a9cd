use drawkit_core::{PointerEvent, SceneAdapter};

use super::{Tool, ToolContext, Transition};
use crate::animation::{AnimationSnapshot, AnimationUpdate};
use crate::artefact::ArtefactId;
use crate::commands::{Animate, DesignerCommand};
use crate::error::Result;

/// Drags an animation handle, such as a rotation center or bounce target.
#[derive(Debug, Clone)]
pub struct TweakTool {
    owner: ArtefactId,
    before: Option<AnimationSnapshot>,
}

impl TweakTool {
    pub fn new(owner: ArtefactId) -> Self {
        Self {
            owner,
            before: None,
        }
    }

    pub fn owner(&self) -> ArtefactId {
        self.owner
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        self.before = ctx.canvas.animation_snapshot(self.owner)?;
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        ctx.canvas
            .update_animation(self.owner, &AnimationUpdate::Pointer(*event))?;
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        let after = ctx.canvas.animation_snapshot(self.owner)?;
        let before = self.before.take();
        if before.is_some() && after != before {
            ctx.record(DesignerCommand::Animate(Animate {
                id: self.owner,
                before,
                after,
            }))?;
        }
        Ok(Transition::To(Tool::Select))
    }
}
