use drawkit_core::{PointerEvent, SceneAdapter};

use super::{
    hand_off, CloneTool, DragTool, ManipulateTool, RectSelectTool, Tool, ToolContext, Transition,
    TweakTool,
};
use crate::canvas::HitTarget;
use crate::error::Result;

/// Routes a pointer-down to the tool that owns the gesture.
pub(super) fn pointer_down<S: SceneAdapter>(
    ctx: &mut ToolContext<'_, S>,
    event: &PointerEvent,
) -> Result<Transition> {
    let additive = event.modifiers.contains(ctx.settings.additive_modifier);
    let next = match ctx.canvas.hit(event.point)? {
        HitTarget::None => {
            ctx.canvas.deselect_all()?;
            Tool::RectSelect(RectSelectTool::new())
        }
        HitTarget::ResizeHandle { owner, role } => {
            Tool::Manipulate(ManipulateTool::new(owner, role))
        }
        HitTarget::AnimationHandle { owner } => Tool::Tweak(TweakTool::new(owner)),
        HitTarget::Artefact(id) => {
            if additive {
                ctx.canvas.toggle(id)?;
            } else if !ctx.canvas.is_selected(id) {
                ctx.canvas.select_only(&[id])?;
            }
            let targets = ctx.canvas.selected();
            if event.modifiers.contains(ctx.settings.duplicate_modifier) && !targets.is_empty() {
                Tool::Clone(CloneTool::new(targets))
            } else {
                Tool::Drag(DragTool::new(targets))
            }
        }
    };
    hand_off(next, ctx, event)
}
