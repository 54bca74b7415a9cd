use drawkit_core::{Point, PointerEvent, SceneAdapter};
use tracing::debug;

use super::{Tool, ToolContext, Transition};
use crate::artefact::ArtefactId;
use crate::commands::{DesignerCommand, Insertion, MoveArtefacts};
use crate::error::Result;

/// Moves the selection by pointer deltas.
#[derive(Debug, Clone, Default)]
pub struct DragTool {
    targets: Vec<ArtefactId>,
    total: Point,
}

impl DragTool {
    pub fn new(targets: Vec<ArtefactId>) -> Self {
        Self {
            targets,
            total: Point::ZERO,
        }
    }

    pub fn targets(&self) -> &[ArtefactId] {
        &self.targets
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        _ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        if !self.targets.is_empty() && !event.delta.is_zero() {
            ctx.canvas.move_by(&self.targets, event.delta)?;
            self.total = self.total + event.delta;
        }
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        if !self.targets.is_empty() && !self.total.is_zero() {
            debug!("Moved {} artefacts by {:?}", self.targets.len(), self.total);
            ctx.record(DesignerCommand::Move(MoveArtefacts {
                ids: std::mem::take(&mut self.targets),
                delta: self.total,
            }))?;
        }
        Ok(Transition::To(Tool::Select))
    }
}

/// Duplicates the selection on pointer-down and drags the copies.
#[derive(Debug, Clone, Default)]
pub struct CloneTool {
    sources: Vec<ArtefactId>,
    copies: Vec<ArtefactId>,
}

impl CloneTool {
    pub fn new(sources: Vec<ArtefactId>) -> Self {
        Self {
            sources,
            copies: Vec::new(),
        }
    }

    pub fn copies(&self) -> &[ArtefactId] {
        &self.copies
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        for source in &self.sources {
            let copy = ctx.canvas.clone_artefact(*source)?;
            self.copies.push(copy);
        }
        ctx.canvas.select_only(&self.copies)?;
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        if !event.delta.is_zero() {
            ctx.canvas.move_by(&self.copies, event.delta)?;
        }
        Ok(Transition::Stay)
    }

    /// Records the copies where they were dropped; redo restores them
    /// there.
    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        _event: &PointerEvent,
    ) -> Result<Transition> {
        if !self.copies.is_empty() {
            debug!("Cloned {} artefacts", self.copies.len());
            ctx.record(DesignerCommand::Clone(Insertion::new(
                std::mem::take(&mut self.copies),
            )))?;
        }
        Ok(Transition::To(Tool::Select))
    }
}
