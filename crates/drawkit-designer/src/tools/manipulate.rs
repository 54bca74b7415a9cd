use drawkit_core::{PointerEvent, SceneAdapter};

use super::{Tool, ToolContext, Transition};
use crate::artefact::ArtefactId;
use crate::canvas::ShapeState;
use crate::commands::{DesignerCommand, Resize};
use crate::error::Result;
use crate::overlay::HandleRole;

/// Resizes or scales an artefact through one of its overlay handles.
#[derive(Debug, Clone)]
pub struct ManipulateTool {
    owner: ArtefactId,
    role: HandleRole,
    before: Option<ShapeState>,
}

impl ManipulateTool {
    pub fn new(owner: ArtefactId, role: HandleRole) -> Self {
        Self {
            owner,
            role,
            before: None,
        }
    }

    pub fn owner(&self) -> ArtefactId {
        self.owner
    }

    pub fn role(&self) -> HandleRole {
        self.role
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        self.before = Some(ctx.canvas.shape_state(self.owner)?);
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        ctx.canvas.manipulate(self.owner, event, self.role)?;
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        if let Some(before) = self.before.take() {
            let after = ctx.canvas.shape_state(self.owner)?;
            if after != before {
                ctx.record(DesignerCommand::Resize(Resize {
                    id: self.owner,
                    before,
                    after,
                }))?;
            }
        }
        Ok(Transition::To(Tool::Select))
    }
}
