//! Tool dispatch state machine.
//!
//! Pointer gestures go to the active [`Tool`]. Handlers return a
//! [`Transition`]; a tool that hands a gesture over constructs the next
//! state, runs its down handler immediately and returns it.

mod drag;
mod draw;
mod manipulate;
mod rect_select;
mod select;
mod tweak;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use drawkit_core::{Color, PointerEvent, SceneAdapter};
use drawkit_settings::ToolSettings;
use tracing::debug;

pub use drag::{CloneTool, DragTool};
pub use draw::DrawTool;
pub use manipulate::ManipulateTool;
pub use rect_select::RectSelectTool;
pub use tweak::TweakTool;

use crate::artefact::ArtefactKind;
use crate::canvas::Canvas;
use crate::commands::DesignerCommand;
use crate::error::{DesignerError, Result};
use crate::history::History;

/// Everything a gesture handler may touch.
pub struct ToolContext<'a, S: SceneAdapter> {
    pub canvas: &'a mut Canvas<S>,
    pub history: &'a mut History<DesignerCommand, Canvas<S>>,
    pub settings: &'a ToolSettings,
    /// Fill for newly drawn shapes.
    pub fill: Color,
}

impl<S: SceneAdapter> ToolContext<'_, S> {
    /// Records a finished gesture in the history.
    pub fn record(&mut self, command: DesignerCommand) -> Result<()> {
        self.history.record(command, &mut *self.canvas)
    }
}

/// What the machine does after a handler ran.
#[derive(Debug)]
pub enum Transition {
    Stay,
    To(Tool),
}

/// Tools that can be armed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    Select,
    Rectangle,
    Circle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Select, ToolKind::Rectangle, ToolKind::Circle];

    /// Fresh state for the armed tool.
    pub fn tool(self) -> Tool {
        match self {
            ToolKind::Select => Tool::Select,
            ToolKind::Rectangle => Tool::RectangleDraw(DrawTool::new(ArtefactKind::Rectangle)),
            ToolKind::Circle => Tool::CircleDraw(DrawTool::new(ArtefactKind::Circle)),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Rectangle => write!(f, "rectangle"),
            Self::Circle => write!(f, "circle"),
        }
    }
}

impl FromStr for ToolKind {
    type Err = DesignerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| DesignerError::UnknownTool(s.to_string()))
    }
}

/// Tools the shell can activate by name.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolKind>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        let tools = ToolKind::ALL
            .into_iter()
            .map(|kind| (kind.to_string(), kind))
            .collect();
        Self { tools }
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<ToolKind> {
        self.tools
            .get(name)
            .copied()
            .ok_or_else(|| DesignerError::UnknownTool(name.to_string()))
    }

    /// Registers `kind` under an extra name.
    pub fn alias(&mut self, name: &str, kind: ToolKind) {
        self.tools.insert(name.to_string(), kind);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

/// State of the dispatch machine.
#[derive(Debug)]
pub enum Tool {
    Select,
    RectangleDraw(DrawTool),
    CircleDraw(DrawTool),
    RectSelect(RectSelectTool),
    Drag(DragTool),
    Manipulate(ManipulateTool),
    Clone(CloneTool),
    Tweak(TweakTool),
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Select
    }
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::RectangleDraw(_) => "rectangle-draw",
            Tool::CircleDraw(_) => "circle-draw",
            Tool::RectSelect(_) => "rect-select",
            Tool::Drag(_) => "drag",
            Tool::Manipulate(_) => "manipulate",
            Tool::Clone(_) => "clone",
            Tool::Tweak(_) => "tweak",
        }
    }

    pub fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        match self {
            Tool::Select => select::pointer_down(ctx, event),
            Tool::RectangleDraw(tool) | Tool::CircleDraw(tool) => tool.pointer_down(ctx, event),
            Tool::RectSelect(tool) => tool.pointer_down(ctx, event),
            Tool::Drag(tool) => tool.pointer_down(ctx, event),
            Tool::Manipulate(tool) => tool.pointer_down(ctx, event),
            Tool::Clone(tool) => tool.pointer_down(ctx, event),
            Tool::Tweak(tool) => tool.pointer_down(ctx, event),
        }
    }

    pub fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        match self {
            Tool::Select => Ok(Transition::Stay),
            Tool::RectangleDraw(tool) | Tool::CircleDraw(tool) => tool.pointer_drag(ctx, event),
            Tool::RectSelect(tool) => tool.pointer_drag(ctx, event),
            Tool::Drag(tool) => tool.pointer_drag(ctx, event),
            Tool::Manipulate(tool) => tool.pointer_drag(ctx, event),
            Tool::Clone(tool) => tool.pointer_drag(ctx, event),
            Tool::Tweak(tool) => tool.pointer_drag(ctx, event),
        }
    }

    pub fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        match self {
            Tool::Select => Ok(Transition::Stay),
            Tool::RectangleDraw(tool) | Tool::CircleDraw(tool) => tool.pointer_up(ctx, event),
            Tool::RectSelect(tool) => tool.pointer_up(ctx, event),
            Tool::Drag(tool) => tool.pointer_up(ctx, event),
            Tool::Manipulate(tool) => tool.pointer_up(ctx, event),
            Tool::Clone(tool) => tool.pointer_up(ctx, event),
            Tool::Tweak(tool) => tool.pointer_up(ctx, event),
        }
    }

    /// Drops transient scene nodes of an interrupted gesture.
    pub fn abort<S: SceneAdapter>(&mut self, ctx: &mut ToolContext<'_, S>) -> Result<()> {
        match self {
            Tool::RectangleDraw(tool) | Tool::CircleDraw(tool) => tool.abort(ctx),
            Tool::RectSelect(tool) => tool.abort(ctx),
            _ => Ok(()),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_busy(&self) -> bool {
        match self {
            Tool::Select => false,
            Tool::RectangleDraw(tool) | Tool::CircleDraw(tool) => tool.is_drawing(),
            _ => true,
        }
    }
}

/// Runs `tool`'s down handler and moves the machine into it.
pub(crate) fn hand_off<S: SceneAdapter>(
    mut tool: Tool,
    ctx: &mut ToolContext<'_, S>,
    event: &PointerEvent,
) -> Result<Transition> {
    debug!("Handing gesture to {}", tool.name());
    match tool.pointer_down(ctx, event)? {
        Transition::Stay => Ok(Transition::To(tool)),
        next => Ok(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.to_string().parse::<ToolKind>().unwrap(), kind);
        }
        assert!(matches!(
            "lasso".parse::<ToolKind>(),
            Err(DesignerError::UnknownTool(name)) if name == "lasso"
        ));
    }

    #[test]
    fn test_registry_aliases() {
        let mut registry = ToolRegistry::new();
        registry.alias("rect", ToolKind::Rectangle);
        assert_eq!(registry.get("rect").unwrap(), ToolKind::Rectangle);
        assert_eq!(registry.names().count(), 4);
        assert!(registry.get("pen").is_err());
    }

    #[test]
    fn test_armed_tools() {
        assert!(matches!(ToolKind::Circle.tool(), Tool::CircleDraw(_)));
        assert!(!ToolKind::Rectangle.tool().is_busy());
        assert_eq!(Tool::default().name(), "select");
    }
}
