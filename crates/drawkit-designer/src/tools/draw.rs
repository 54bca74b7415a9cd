use drawkit_core::{Bounds, Geometry, Layer, NodeId, Point, PointerEvent, SceneAdapter, Style};
use tracing::{debug, info};

use super::{ToolContext, Transition};
use crate::artefact::ArtefactKind;
use crate::commands::{DesignerCommand, Insertion};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
struct Preview {
    origin: Point,
    node: NodeId,
}

/// Rubber-band creation of rectangles and circles.
///
/// Stays armed after each shape; drags smaller than the minimum size
/// create nothing.
#[derive(Debug, Clone)]
pub struct DrawTool {
    kind: ArtefactKind,
    preview: Option<Preview>,
}

impl DrawTool {
    pub fn new(kind: ArtefactKind) -> Self {
        Self {
            kind,
            preview: None,
        }
    }

    pub fn kind(&self) -> ArtefactKind {
        self.kind
    }

    pub fn is_drawing(&self) -> bool {
        self.preview.is_some()
    }

    fn outline(&self, origin: Point, point: Point) -> Geometry {
        match self.kind {
            ArtefactKind::Circle => Geometry::circle(origin, origin.distance_to(&point)),
            _ => Geometry::rectangle(&Bounds::new(origin.x, origin.y, point.x, point.y)),
        }
    }

    pub(super) fn pointer_down<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        self.abort(ctx)?;
        ctx.canvas.deselect_all()?;
        let accent = ctx.canvas.overlay_style().accent;
        let scene = &mut ctx.canvas.scene;
        let layer = scene.layer(Layer::Overlay);
        let node = scene.create_shape(
            layer,
            self.outline(event.point, event.point),
            Style::outline(accent, 1.0).dashed().inert(),
        )?;
        self.preview = Some(Preview {
            origin: event.point,
            node,
        });
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_drag<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        if let Some(preview) = self.preview {
            ctx.canvas
                .scene
                .set_geometry(preview.node, self.outline(preview.origin, event.point))?;
        }
        Ok(Transition::Stay)
    }

    pub(super) fn pointer_up<S: SceneAdapter>(
        &mut self,
        ctx: &mut ToolContext<'_, S>,
        event: &PointerEvent,
    ) -> Result<Transition> {
        let Some(preview) = self.preview.take() else {
            return Ok(Transition::Stay);
        };
        ctx.canvas.scene.remove(preview.node)?;

        let origin = preview.origin;
        let min_size = ctx.canvas.min_size();
        let created = match self.kind {
            ArtefactKind::Circle => {
                let radius = origin.distance_to(&event.point);
                if radius * 2.0 < min_size {
                    None
                } else {
                    Some(ctx.canvas.draw_circle(origin, radius, ctx.fill)?)
                }
            }
            _ => {
                let bounds = Bounds::new(origin.x, origin.y, event.point.x, event.point.y);
                if bounds.width() < min_size || bounds.height() < min_size {
                    None
                } else {
                    Some(ctx.canvas.draw_rectangle(&bounds, ctx.fill)?)
                }
            }
        };

        match created {
            Some(id) => {
                info!("Drew {} {}", self.kind, id);
                ctx.record(DesignerCommand::Create(Insertion::new(vec![id])))?;
                ctx.canvas.select_only(&[id])?;
            }
            None => debug!("Discarded {} below minimum size", self.kind),
        }
        Ok(Transition::Stay)
    }

    /// Removes the preview outline, if any.
    pub(super) fn abort<S: SceneAdapter>(&mut self, ctx: &mut ToolContext<'_, S>) -> Result<()> {
        if let Some(preview) = self.preview.take() {
            ctx.canvas.scene.remove(preview.node)?;
        }
        Ok(())
    }
}
