//! Reversible designer actions recorded in the history.
//!
//! Every command is registered after its action already happened, so
//! `execute` only runs on redo.

use drawkit_core::{Affine, Color, Point, SceneAdapter};

use crate::animation::AnimationSnapshot;
use crate::artefact::ArtefactId;
use crate::canvas::{Canvas, Detached, ShapeState, Ungrouped};
use crate::error::{DesignerError, Result};
use crate::history::Command;

#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum DesignerCommand {
    Create(Insertion),
    Clone(Insertion),
    Delete(Deletion),
    Move(MoveArtefacts),
    Resize(Resize),
    Group(GroupArtefacts),
    Ungroup(UngroupArtefacts),
    Recolor(Recolor),
    Reorder(Reorder),
    Animate(Animate),
    Composite(CompositeCommand),
}

/// Artefacts that were created (drawn or cloned).
#[derive(Debug, Clone, Default)]
pub struct Insertion {
    pub ids: Vec<ArtefactId>,
    /// Filled while undone.
    pub detached: Vec<Detached>,
}

impl Insertion {
    pub fn new(ids: Vec<ArtefactId>) -> Self {
        Self {
            ids,
            detached: Vec::new(),
        }
    }
}

/// Artefacts that were destroyed.
#[derive(Debug, Clone, Default)]
pub struct Deletion {
    pub ids: Vec<ArtefactId>,
    /// In destruction order; empty while undone.
    pub detached: Vec<Detached>,
}

#[derive(Debug, Clone)]
pub struct MoveArtefacts {
    pub ids: Vec<ArtefactId>,
    pub delta: Point,
}

#[derive(Debug, Clone)]
pub struct Resize {
    pub id: ArtefactId,
    pub before: ShapeState,
    pub after: ShapeState,
}

#[derive(Debug, Clone)]
pub struct GroupArtefacts {
    pub group_id: ArtefactId,
    pub children: Vec<ArtefactId>,
    /// Draw-order index of each child before grouping, ascending.
    pub slots: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct UngroupArtefacts {
    pub group_id: ArtefactId,
    pub children: Vec<ArtefactId>,
    pub matrix: Affine,
    pub animation: Option<AnimationSnapshot>,
}

impl UngroupArtefacts {
    pub fn new(group_id: ArtefactId, ungrouped: Ungrouped) -> Self {
        Self {
            group_id,
            children: ungrouped.children,
            matrix: ungrouped.matrix,
            animation: ungrouped.animation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recolor {
    /// Every repainted leaf with its previous fill.
    pub before: Vec<(ArtefactId, Option<Color>)>,
    pub after: Color,
}

#[derive(Debug, Clone)]
pub struct Reorder {
    pub id: ArtefactId,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct Animate {
    pub id: ArtefactId,
    pub before: Option<AnimationSnapshot>,
    pub after: Option<AnimationSnapshot>,
}

#[derive(Debug, Clone)]
pub struct CompositeCommand {
    pub commands: Vec<DesignerCommand>,
    pub name: String,
}

impl DesignerCommand {
    pub fn apply<S: SceneAdapter>(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        match self {
            DesignerCommand::Create(cmd) | DesignerCommand::Clone(cmd) => {
                while let Some(detached) = cmd.detached.pop() {
                    canvas.restore(detached)?;
                }
            }
            DesignerCommand::Delete(cmd) => {
                for id in &cmd.ids {
                    cmd.detached.push(canvas.destroy(*id)?);
                }
            }
            DesignerCommand::Move(cmd) => canvas.move_by(&cmd.ids, cmd.delta)?,
            DesignerCommand::Resize(cmd) => canvas.set_shape_state(cmd.id, &cmd.after)?,
            DesignerCommand::Group(cmd) => {
                canvas.group_with(cmd.group_id, &cmd.children, Affine::identity(), None)?
            }
            DesignerCommand::Ungroup(cmd) => {
                canvas.ungroup(cmd.group_id)?;
            }
            DesignerCommand::Recolor(cmd) => {
                for (id, _) in &cmd.before {
                    canvas.set_fill(*id, Some(cmd.after))?;
                }
            }
            DesignerCommand::Reorder(cmd) => canvas.move_to_index(cmd.id, cmd.to)?,
            DesignerCommand::Animate(cmd) => canvas.apply_animation(cmd.id, cmd.after.as_ref())?,
            DesignerCommand::Composite(cmd) => {
                for sub_cmd in &mut cmd.commands {
                    sub_cmd.apply(canvas)?;
                }
            }
        }
        Ok(())
    }

    pub fn undo<S: SceneAdapter>(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        match self {
            DesignerCommand::Create(cmd) | DesignerCommand::Clone(cmd) => {
                for id in &cmd.ids {
                    cmd.detached.push(canvas.destroy(*id)?);
                }
            }
            DesignerCommand::Delete(cmd) => {
                while let Some(detached) = cmd.detached.pop() {
                    canvas.restore(detached)?;
                }
            }
            DesignerCommand::Move(cmd) => canvas.move_by(&cmd.ids, -cmd.delta)?,
            DesignerCommand::Resize(cmd) => canvas.set_shape_state(cmd.id, &cmd.before)?,
            DesignerCommand::Group(cmd) => {
                canvas.ungroup_to(cmd.group_id, &cmd.slots)?;
            }
            DesignerCommand::Ungroup(cmd) => canvas.group_with(
                cmd.group_id,
                &cmd.children,
                cmd.matrix,
                cmd.animation.as_ref(),
            )?,
            DesignerCommand::Recolor(cmd) => {
                for (id, fill) in &cmd.before {
                    canvas.set_fill(*id, *fill)?;
                }
            }
            DesignerCommand::Reorder(cmd) => canvas.move_to_index(cmd.id, cmd.from)?,
            DesignerCommand::Animate(cmd) => canvas.apply_animation(cmd.id, cmd.before.as_ref())?,
            DesignerCommand::Composite(cmd) => {
                for sub_cmd in cmd.commands.iter_mut().rev() {
                    sub_cmd.undo(canvas)?;
                }
            }
        }
        Ok(())
    }

    /// Releases detached geometry held by a command leaving the history.
    pub fn discard<S: SceneAdapter>(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        match self {
            DesignerCommand::Create(Insertion { detached, .. })
            | DesignerCommand::Clone(Insertion { detached, .. })
            | DesignerCommand::Delete(Deletion { detached, .. }) => {
                for entry in detached.drain(..) {
                    canvas.release(entry)?;
                }
            }
            DesignerCommand::Composite(cmd) => {
                for sub_cmd in &mut cmd.commands {
                    sub_cmd.discard(canvas)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        match self {
            DesignerCommand::Create(_) => "Create",
            DesignerCommand::Clone(_) => "Clone",
            DesignerCommand::Delete(_) => "Delete",
            DesignerCommand::Move(_) => "Move",
            DesignerCommand::Resize(_) => "Resize",
            DesignerCommand::Group(_) => "Group",
            DesignerCommand::Ungroup(_) => "Ungroup",
            DesignerCommand::Recolor(_) => "Recolor",
            DesignerCommand::Reorder(_) => "Reorder",
            DesignerCommand::Animate(_) => "Animate",
            DesignerCommand::Composite(cmd) => &cmd.name,
        }
    }
}

impl<S: SceneAdapter> Command<Canvas<S>> for DesignerCommand {
    type Error = DesignerError;

    fn execute(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        self.apply(canvas)
    }

    fn undo(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        DesignerCommand::undo(self, canvas)
    }

    fn name(&self) -> &str {
        DesignerCommand::name(self)
    }

    fn discard(&mut self, canvas: &mut Canvas<S>) -> Result<()> {
        DesignerCommand::discard(self, canvas)
    }
}
