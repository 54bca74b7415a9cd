//! Drawing session: the explicitly owned context of one canvas.
//!
//! A [`Session`] owns the canvas with its scene, the history, the tool state
//! machine, the tool and action registries, the swatches and the frame
//! clock. Shell code drives it with pointer, key and frame events and reads
//! state back through its accessors.
//!
//! # Example
//!
//! ```
//! use drawkit_core::{Point, PointerEvent};
//! use drawkit_designer::session::Session;
//!
//! let mut session = Session::default();
//! session.activate_tool("rectangle").unwrap();
//! let down = Point::new(20.0, 30.0);
//! let up = Point::new(120.0, 170.0);
//! session.pointer_down(&PointerEvent::down(down)).unwrap();
//! session.pointer_drag(&PointerEvent::moved(down, down, up)).unwrap();
//! session.pointer_up(&PointerEvent::moved(down, up, up)).unwrap();
//!
//! assert_eq!(session.selected().len(), 1);
//! assert!(session.undo().unwrap());
//! assert!(session.canvas().top_level().is_empty());
//! ```

use std::fmt;

use drawkit_core::{FrameEvent, KeyEvent, PointerEvent, Scene, SceneAdapter};
use drawkit_settings::Settings;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::actions::ActionRegistry;
use crate::animation::{AnimationKind, AnimationState};
use crate::artefact::ArtefactId;
use crate::canvas::Canvas;
use crate::commands::{
    Animate, CompositeCommand, Deletion, DesignerCommand, GroupArtefacts, Insertion, Recolor,
    Reorder, UngroupArtefacts,
};
use crate::error::Result;
use crate::history::History;
use crate::swatches::Swatches;
use crate::tools::{Tool, ToolContext, ToolKind, ToolRegistry, Transition};

/// Unique identity of a session, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counts frames and accumulates time for [`Session::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    count: u64,
    time: f64,
}

impl FrameClock {
    /// Produces the next frame event `delta` seconds after the previous one.
    pub fn advance(&mut self, delta: f64) -> FrameEvent {
        self.time += delta;
        let frame = FrameEvent::new(self.count, self.time, delta);
        self.count += 1;
        frame
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Down,
    Drag,
    Up,
}

pub struct Session<S: SceneAdapter = Scene> {
    id: SessionId,
    canvas: Canvas<S>,
    history: History<DesignerCommand, Canvas<S>>,
    tool: Tool,
    armed: ToolKind,
    tools: ToolRegistry,
    actions: ActionRegistry<S>,
    swatches: Swatches,
    settings: Settings,
    clock: FrameClock,
}

impl Default for Session<Scene> {
    fn default() -> Self {
        Self::new(Scene::new(), Settings::default())
    }
}

impl<S: SceneAdapter> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("tool", &self.tool.name())
            .field("armed", &self.armed)
            .field("artefacts", &self.canvas.artefact_count())
            .field("history", &self.history.len())
            .finish()
    }
}

impl<S: SceneAdapter> Session<S> {
    pub fn new(scene: S, settings: Settings) -> Self {
        let id = SessionId::new();
        info!("Starting drawing session {}", id);
        Self {
            id,
            canvas: Canvas::new(scene, &settings),
            history: History::new(settings.history.capacity),
            tool: Tool::Select,
            armed: ToolKind::Select,
            tools: ToolRegistry::new(),
            actions: ActionRegistry::default(),
            swatches: Swatches::from_settings(&settings),
            settings,
            clock: FrameClock::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History<DesignerCommand, Canvas<S>> {
        &self.history
    }

    /// Current state of the tool machine.
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Tool the machine rests in between gestures.
    pub fn armed_tool(&self) -> ToolKind {
        self.armed
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    pub fn actions(&self) -> &ActionRegistry<S> {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry<S> {
        &mut self.actions
    }

    pub fn swatches(&self) -> &Swatches {
        &self.swatches
    }

    pub fn swatches_mut(&mut self) -> &mut Swatches {
        &mut self.swatches
    }

    // Pointer input

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        self.dispatch(Phase::Down, event)
    }

    pub fn pointer_drag(&mut self, event: &PointerEvent) -> Result<()> {
        self.dispatch(Phase::Drag, event)
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Result<()> {
        self.dispatch(Phase::Up, event)
    }

    fn dispatch(&mut self, phase: Phase, event: &PointerEvent) -> Result<()> {
        let mut ctx = ToolContext {
            canvas: &mut self.canvas,
            history: &mut self.history,
            settings: &self.settings.tools,
            fill: self.swatches.active(),
        };
        let outcome = match phase {
            Phase::Down => self.tool.pointer_down(&mut ctx, event),
            Phase::Drag => self.tool.pointer_drag(&mut ctx, event),
            Phase::Up => self.tool.pointer_up(&mut ctx, event),
        };
        match outcome {
            Ok(Transition::Stay) => Ok(()),
            Ok(Transition::To(next)) => {
                debug!("Tool {} -> {}", self.tool.name(), next.name());
                self.tool = next;
                Ok(())
            }
            Err(err) => {
                error!("{} gesture failed: {}", self.tool.name(), err);
                if let Err(abort_err) = self.tool.abort(&mut ctx) {
                    warn!("Failed to clean up {} gesture: {}", self.tool.name(), abort_err);
                }
                self.tool = Tool::Select;
                self.armed = ToolKind::Select;
                Err(err)
            }
        }
    }

    /// Abandons an in-progress gesture, returning to the armed tool.
    pub fn cancel_gesture(&mut self) {
        if !self.tool.is_busy() {
            return;
        }
        let mut ctx = ToolContext {
            canvas: &mut self.canvas,
            history: &mut self.history,
            settings: &self.settings.tools,
            fill: self.swatches.active(),
        };
        if let Err(err) = self.tool.abort(&mut ctx) {
            warn!("Failed to clean up {} gesture: {}", self.tool.name(), err);
        }
        debug!("Cancelled {} gesture", self.tool.name());
        self.tool = self.armed.tool();
    }

    // Keyboard

    /// Applies a keyboard shortcut. Returns `false` for unbound keys.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<bool> {
        let key = event.key.to_lowercase();
        let command = event.modifiers.command();
        let shift = event.modifiers.shift;
        let selected = self.selected();
        match key.as_str() {
            "delete" | "backspace" => self.delete(&selected)?,
            "escape" => {
                self.cancel_gesture();
                self.canvas.deselect_all()?;
            }
            "z" if command && shift => {
                self.redo()?;
            }
            "z" if command => {
                self.undo()?;
            }
            "y" if command => {
                self.redo()?;
            }
            "g" if command && shift => self.ungroup(&selected)?,
            "g" if command => {
                self.group(&selected)?;
            }
            "d" if command => {
                self.clone_artefacts(&selected)?;
            }
            " " | "space" => self.toggle_playback(&selected)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    // History

    pub fn undo(&mut self) -> Result<bool> {
        self.cancel_gesture();
        self.history.undo(&mut self.canvas).inspect_err(|err| {
            error!("Undo failed: {}", err);
        })
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.cancel_gesture();
        self.history.redo(&mut self.canvas).inspect_err(|err| {
            error!("Redo failed: {}", err);
        })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    fn commit(&mut self, name: &str, mut commands: Vec<DesignerCommand>) -> Result<()> {
        let command = match commands.len() {
            0 => return Ok(()),
            1 => match commands.pop() {
                Some(command) => command,
                None => return Ok(()),
            },
            _ => DesignerCommand::Composite(CompositeCommand {
                commands,
                name: name.to_string(),
            }),
        };
        self.record(command)
    }

    fn record(&mut self, command: DesignerCommand) -> Result<()> {
        debug!("Registering {}", command.name());
        self.history.record(command, &mut self.canvas)
    }

    // Selection

    /// Selected artefacts in draw order.
    pub fn selected(&self) -> Vec<ArtefactId> {
        self.canvas.selected()
    }

    pub fn select_only(&mut self, ids: &[ArtefactId]) -> Result<()> {
        self.canvas.select_only(ids)
    }

    pub fn select_all(&mut self) -> Result<()> {
        let all = self.canvas.top_level();
        self.canvas.select_only(&all)
    }

    pub fn deselect_all(&mut self) -> Result<()> {
        self.canvas.deselect_all()
    }

    // Registries

    /// Arms the tool registered under `name`, abandoning any gesture.
    pub fn activate_tool(&mut self, name: &str) -> Result<ToolKind> {
        let kind = self.tools.get(name)?;
        self.cancel_gesture();
        self.armed = kind;
        self.tool = kind.tool();
        debug!("Armed tool {}", kind);
        Ok(kind)
    }

    /// Runs action `name` on the current selection.
    pub fn invoke_action(&mut self, name: &str) -> Result<()> {
        let selected = self.selected();
        self.invoke_action_on(name, &selected)
    }

    pub fn invoke_action_on(&mut self, name: &str, ids: &[ArtefactId]) -> Result<()> {
        let action = self.actions.get(name)?;
        debug!("Invoking action {} on {} artefacts", name, ids.len());
        action(self, ids).inspect_err(|err| error!("Action {} failed: {}", name, err))
    }

    // Frame clock

    /// Drives every active animation one frame.
    pub fn tick(&mut self, frame: &FrameEvent) -> Result<usize> {
        self.canvas.tick(frame)
    }

    /// Ticks the session's own clock `delta` seconds forward.
    pub fn advance(&mut self, delta: f64) -> Result<usize> {
        let frame = self.clock.advance(delta);
        self.tick(&frame)
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    // Actions

    /// Destroys the given artefacts as one undoable step.
    pub fn delete(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let ids = dedup(ids);
        let mut detached = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.canvas.destroy(*id) {
                Ok(d) => detached.push(d),
                Err(err) => {
                    while let Some(d) = detached.pop() {
                        self.canvas.restore(d)?;
                    }
                    return Err(err);
                }
            }
        }
        if !detached.is_empty() {
            info!("Deleted {} artefacts", detached.len());
            self.record(DesignerCommand::Delete(Deletion { ids, detached }))?;
        }
        Ok(())
    }

    /// Groups the artefacts and selects the new group. Returns `None` when
    /// fewer than two were given.
    pub fn group(&mut self, ids: &[ArtefactId]) -> Result<Option<ArtefactId>> {
        let mut slots = Vec::new();
        for id in self.canvas.top_level() {
            if ids.contains(&id) {
                slots.push(self.canvas.index_of(id)?);
            }
        }
        let Some(group_id) = self.canvas.group(ids)? else {
            return Ok(None);
        };
        let children = self.canvas.artefact(group_id)?.children().to_vec();
        self.record(DesignerCommand::Group(GroupArtefacts {
            group_id,
            children,
            slots,
        }))?;
        self.canvas.select_only(&[group_id])?;
        Ok(Some(group_id))
    }

    /// Dissolves every group among `ids` and selects the freed children.
    pub fn ungroup(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let mut commands = Vec::new();
        let mut freed = Vec::new();
        for id in dedup(ids) {
            if !self.canvas.artefact(id)?.is_group() {
                continue;
            }
            let ungrouped = self.canvas.ungroup(id)?;
            freed.extend_from_slice(&ungrouped.children);
            commands.push(DesignerCommand::Ungroup(UngroupArtefacts::new(id, ungrouped)));
        }
        self.commit("Ungroup", commands)?;
        if !freed.is_empty() {
            self.canvas.select_only(&freed)?;
        }
        Ok(())
    }

    /// Duplicates the artefacts in place and selects the copies.
    pub fn clone_artefacts(&mut self, ids: &[ArtefactId]) -> Result<Vec<ArtefactId>> {
        let mut copies = Vec::new();
        for id in dedup(ids) {
            copies.push(self.canvas.clone_artefact(id)?);
        }
        if !copies.is_empty() {
            self.record(DesignerCommand::Clone(Insertion::new(copies.clone())))?;
            self.canvas.select_only(&copies)?;
        }
        Ok(copies)
    }

    pub fn bring_to_front(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let ordered = self.in_draw_order(ids);
        self.reorder(ordered, |canvas, id| canvas.bring_to_front(id))
    }

    pub fn send_to_back(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let mut ordered = self.in_draw_order(ids);
        ordered.reverse();
        self.reorder(ordered, |canvas, id| canvas.send_to_back(id))
    }

    fn in_draw_order(&self, ids: &[ArtefactId]) -> Vec<ArtefactId> {
        self.canvas
            .top_level()
            .into_iter()
            .filter(|id| ids.contains(id))
            .collect()
    }

    fn reorder(
        &mut self,
        ids: Vec<ArtefactId>,
        op: fn(&mut Canvas<S>, ArtefactId) -> Result<()>,
    ) -> Result<()> {
        let mut commands = Vec::new();
        for id in ids {
            let from = self.canvas.index_of(id)?;
            op(&mut self.canvas, id)?;
            let to = self.canvas.index_of(id)?;
            if from != to {
                commands.push(DesignerCommand::Reorder(Reorder { id, from, to }));
            }
        }
        self.commit("Reorder", commands)?;
        Ok(())
    }

    /// Paints the artefacts with the active swatch.
    pub fn recolor(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let color = self.swatches.active();
        let mut before = Vec::new();
        for id in dedup(ids) {
            before.extend(self.canvas.fills(id)?);
            self.canvas.recolor(id, color)?;
        }
        if before.iter().any(|(_, fill)| *fill != Some(color)) {
            self.record(DesignerCommand::Recolor(Recolor {
                before,
                after: color,
            }))?;
        }
        Ok(())
    }

    /// Replaces each artefact's animation with a fresh idle one of `kind`.
    pub fn animate(&mut self, ids: &[ArtefactId], kind: AnimationKind) -> Result<()> {
        let mut commands = Vec::new();
        for id in dedup(ids) {
            let before = self.canvas.animation_snapshot(id)?;
            self.canvas.animate(id, kind)?;
            let after = self.canvas.animation_snapshot(id)?;
            commands.push(DesignerCommand::Animate(Animate { id, before, after }));
        }
        self.commit("Animate", commands)?;
        Ok(())
    }

    pub fn remove_animations(&mut self, ids: &[ArtefactId]) -> Result<()> {
        let mut commands = Vec::new();
        for id in dedup(ids) {
            if let Some(before) = self.canvas.remove_animation(id)? {
                commands.push(DesignerCommand::Animate(Animate {
                    id,
                    before: Some(before),
                    after: None,
                }));
            }
        }
        self.commit("Animate", commands)?;
        Ok(())
    }

    /// Returns how many animations started.
    pub fn start_animations(&mut self, ids: &[ArtefactId]) -> Result<usize> {
        let mut started = 0;
        for id in ids {
            if self.canvas.start_animation(*id)? {
                started += 1;
            }
        }
        Ok(started)
    }

    /// Returns how many animations paused.
    pub fn pause_animations(&mut self, ids: &[ArtefactId]) -> Result<usize> {
        let mut paused = 0;
        for id in ids {
            if self.canvas.pause_animation(*id)? {
                paused += 1;
            }
        }
        Ok(paused)
    }

    /// Returns how many animations were running.
    pub fn stop_animations(&mut self, ids: &[ArtefactId]) -> Result<usize> {
        let mut stopped = 0;
        for id in ids {
            if self.canvas.stop_animation(*id)? {
                stopped += 1;
            }
        }
        Ok(stopped)
    }

    /// Pauses active animations and starts the others.
    pub fn toggle_playback(&mut self, ids: &[ArtefactId]) -> Result<()> {
        for id in ids {
            let state = self.canvas.artefact(*id)?.animation().map(|a| a.state());
            match state {
                Some(AnimationState::Active) => {
                    self.canvas.pause_animation(*id)?;
                }
                Some(_) => {
                    self.canvas.start_animation(*id)?;
                }
                None => {}
            }
        }
        Ok(())
    }
}

fn dedup(ids: &[ArtefactId]) -> Vec<ArtefactId> {
    let mut out: Vec<ArtefactId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawkit_core::{Bounds, Color, Modifiers};

    fn session_with_rects(count: usize) -> (Session, Vec<ArtefactId>) {
        let mut session = Session::default();
        let ids = (0..count)
            .map(|i| {
                let x = i as f64 * 50.0;
                session
                    .canvas
                    .draw_rectangle(&Bounds::from_rect(x, 0.0, 40.0, 40.0), Color::BLACK)
                    .unwrap()
            })
            .collect();
        (session, ids)
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::default();
        let first = clock.advance(0.5);
        let second = clock.advance(0.5);
        assert_eq!(first.count, 0);
        assert_eq!(second.count, 1);
        assert_eq!(second.time, 1.0);
        assert_eq!(clock.count(), 2);
    }

    #[test]
    fn test_delete_undo_restores_order() {
        let (mut session, ids) = session_with_rects(3);
        session.delete(&[ids[0], ids[1]]).unwrap();
        assert_eq!(session.canvas().top_level(), vec![ids[2]]);
        assert_eq!(session.undo_description(), Some("Delete"));
        session.undo().unwrap();
        assert_eq!(session.canvas().top_level(), ids);
        session.redo().unwrap();
        assert_eq!(session.canvas().top_level(), vec![ids[2]]);
    }

    #[test]
    fn test_delete_rolls_back_on_error() {
        let (mut session, ids) = session_with_rects(1);
        let err = session.delete(&[ids[0], ArtefactId(99)]).unwrap_err();
        assert!(matches!(err, crate::DesignerError::UnknownArtefact(_)));
        assert_eq!(session.canvas().top_level(), ids);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_reorder_is_one_step() {
        let (mut session, ids) = session_with_rects(4);
        session.bring_to_front(&[ids[0], ids[1]]).unwrap();
        assert_eq!(
            session.canvas().top_level(),
            vec![ids[2], ids[3], ids[0], ids[1]]
        );
        assert_eq!(session.history().len(), 1);
        session.undo().unwrap();
        assert_eq!(session.canvas().top_level(), ids);

        session.send_to_back(&[ids[2], ids[3]]).unwrap();
        assert_eq!(
            session.canvas().top_level(),
            vec![ids[2], ids[3], ids[0], ids[1]]
        );
        session.undo().unwrap();
        assert_eq!(session.canvas().top_level(), ids);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let (mut session, ids) = session_with_rects(2);
        session.select_all().unwrap();
        let ctrl = Modifiers::control();
        assert!(session.handle_key(&KeyEvent::new("g", ctrl)).unwrap());
        let group = session.selected()[0];
        assert!(session.canvas().artefact(group).unwrap().is_group());

        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::control()
        };
        assert!(session.handle_key(&KeyEvent::new("G", ctrl_shift)).unwrap());
        assert_eq!(session.selected(), ids);

        assert!(session.handle_key(&KeyEvent::new("Escape", Modifiers::NONE)).unwrap());
        assert!(session.selected().is_empty());
        assert!(!session.handle_key(&KeyEvent::new("q", Modifiers::NONE)).unwrap());

        assert!(session.handle_key(&KeyEvent::new("z", ctrl)).unwrap());
        assert!(session.handle_key(&KeyEvent::new("z", ctrl)).unwrap());
        assert!(!session.can_undo());
        assert!(session.handle_key(&KeyEvent::new("y", ctrl)).unwrap());
        assert_eq!(session.undo_description(), Some("Group"));
    }

    #[test]
    fn test_space_toggles_playback() {
        let (mut session, ids) = session_with_rects(1);
        session.animate(&ids, AnimationKind::Rotate).unwrap();
        session.select_only(&ids).unwrap();
        let space = KeyEvent::new(" ", Modifiers::NONE);
        session.handle_key(&space).unwrap();
        assert_eq!(session.advance(1.0 / 60.0).unwrap(), 1);
        session.handle_key(&space).unwrap();
        assert_eq!(session.advance(1.0 / 60.0).unwrap(), 0);
        let state = session
            .canvas()
            .artefact(ids[0])
            .unwrap()
            .animation()
            .map(|a| a.state());
        assert_eq!(state, Some(AnimationState::Paused));
    }

    #[test]
    fn test_recolor_uses_active_swatch() {
        let (mut session, ids) = session_with_rects(1);
        session.swatches_mut().set_active(1).unwrap();
        let color = session.swatches().active();
        session.recolor(&ids).unwrap();
        assert_eq!(session.canvas().fills(ids[0]).unwrap(), vec![(ids[0], Some(color))]);
        session.undo().unwrap();
        assert_eq!(
            session.canvas().fills(ids[0]).unwrap(),
            vec![(ids[0], Some(Color::BLACK))]
        );
    }

    #[test]
    fn test_unknown_tool_keeps_armed_tool() {
        let mut session = Session::default();
        session.activate_tool("circle").unwrap();
        assert!(session.activate_tool("pen").is_err());
        assert_eq!(session.armed_tool(), ToolKind::Circle);
    }
}
