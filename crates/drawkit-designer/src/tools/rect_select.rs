use drawkit_core::{Bounds, Geometry, Layer, NodeId, Point, PointerEvent, SceneAdapter, Style};

use super::{Tool, ToolContext, Transition};
use crate::error::Result;

/// Marquee selection started on empty canvas.
#[derive(Debug, Clone)]
pub struct RectSelectTool {
    origin: Point,
    marquee: Option<NodeId>,
}

impl Default for RectSelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RectSelectTool {
    pub fn new() -> Self {
        Self {
            origin: Point::ZERO,
            marquee: None,
        }
    }

    fn area(&self, point: Point) -> Bounds {
        Bounds::new(self.origin.x, self.origin.y, point.x, point.y)
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        self.abort(ctx)?;
        self.origin = event.point;
        let accent = ctx.canvas.overlay_style().accent;
        let scene = &mut ctx.canvas.scene;
        let layer = scene.layer(Layer::Overlay);
        self.marquee = Some(scene.create_shape(
            layer,
            Geometry::rectangle(&self.area(event.point)),
            Style::outline(accent, 1.0).dashed().inert(),
        )?);
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        if let Some(node) = self.marquee {
            ctx.canvas
                .scene
                .set_geometry(node, Geometry::rectangle(&self.area(event.point)))?;
        }
        Ok(Transition::Stay)
    }

    /// Selects every top-level artefact touching the marquee. A click
    /// without movement selects nothing.
    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        self.abort(ctx)?;
        let area = self.area(event.point);
        if area.diagonal() > 0.0 {
            let hits = ctx.canvas.artefacts_in(&area)?;
            ctx.canvas.select_only(&hits)?;
        }
        Ok(Transition::To(Tool::Select))
    }

    pub(super) fn abort<S: SceneAdapter>(&mut self, ctx: &mut ToolContext<'_, S>) -> Result<()> {
        if let Some(node) = self.marquee.take() {
            ctx.canvas.scene.remove(node)?;
        }
        Ok(())
    }
}
