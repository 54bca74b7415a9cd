//! Bounding overlay: the border, handles and footprint shown around a
//! selected artefact.
//!
//! An overlay is a pure function of the artefact's shadow, so rebuilding it
//! from scratch always yields the same decoration.

use std::fmt;

use drawkit_core::{
    Bounds, Color, Corner, Geometry, Layer, NodeId, Point, SceneAdapter, Style,
};
use drawkit_settings::Settings;
use smallvec::SmallVec;

use crate::artefact::ArtefactKind;
use crate::error::Result;

/// Visual parameters shared by every overlay of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub accent: Color,
    pub margin: f64,
    pub handle_size: f64,
    pub footprint_opacity: f32,
    pub stroke_width: f64,
}

impl OverlayStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            accent: settings.theme.accent,
            margin: settings.canvas.border_margin,
            handle_size: settings.canvas.handle_size,
            footprint_opacity: settings.canvas.footprint_opacity,
            stroke_width: settings.canvas.selection_stroke_width,
        }
    }

    fn border(&self) -> Style {
        Style::outline(self.accent, self.stroke_width).inert()
    }

    fn handle(&self) -> Style {
        Style {
            fill: Some(Color::WHITE),
            stroke: Some(self.accent),
            stroke_width: self.stroke_width,
            ..Style::default()
        }
    }

    fn footprint(&self) -> Style {
        Style::filled(self.accent)
            .with_opacity(self.footprint_opacity)
            .inert()
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Semantic position of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    Corner(Corner),
    /// The single scale handle of a circle.
    Scale,
}

impl fmt::Display for HandleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corner(corner) => write!(f, "{}", corner),
            Self::Scale => write!(f, "scale"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub node: NodeId,
    pub role: HandleRole,
    pub position: Point,
}

/// Roles exposed by an artefact kind, in handle order.
///
/// Rectangle roles follow the shadow's segment points, each named after the
/// shadow corner it sits on.
pub fn handle_roles(kind: ArtefactKind, shadow: &Geometry) -> SmallVec<[HandleRole; 4]> {
    match kind {
        ArtefactKind::Rectangle => {
            let Some(bounds) = shadow.bounds() else {
                return SmallVec::new();
            };
            shadow
                .points()
                .iter()
                .map(|p| HandleRole::Corner(bounds.nearest_corner(*p)))
                .collect()
        }
        ArtefactKind::Circle => SmallVec::from_slice(&[HandleRole::Scale]),
        ArtefactKind::Group => Corner::ALL.iter().map(|c| HandleRole::Corner(*c)).collect(),
    }
}

/// Where the handle for `role` sits around shadow bounds `bounds`, or `None`
/// when the kind has no such handle.
pub fn handle_position(
    kind: ArtefactKind,
    bounds: &Bounds,
    role: HandleRole,
    margin: f64,
) -> Option<Point> {
    match (kind, role) {
        (ArtefactKind::Rectangle | ArtefactKind::Group, HandleRole::Corner(corner)) => {
            Some(bounds.expand(margin).corner(corner))
        }
        (ArtefactKind::Circle, HandleRole::Scale) => {
            let center = bounds.center();
            Some(Point::new(center.x + border_radius(bounds, margin), center.y))
        }
        _ => None,
    }
}

fn border_radius(bounds: &Bounds, margin: f64) -> f64 {
    (bounds.width() + margin) / 2.0
}

/// Border, handles and footprint of one selected artefact.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingOverlay {
    pub border: NodeId,
    pub handles: SmallVec<[Handle; 4]>,
    pub footprint: NodeId,
}

impl BoundingOverlay {
    /// Builds the overlay from the artefact's shadow expressed in world space.
    pub fn build<S: SceneAdapter>(
        scene: &mut S,
        kind: ArtefactKind,
        shadow: &Geometry,
        style: &OverlayStyle,
    ) -> Result<Self> {
        let bounds = shadow
            .bounds()
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0));
        let overlay = scene.layer(Layer::Overlay);
        let footprints = scene.layer(Layer::Footprint);

        let footprint_shape = match kind {
            ArtefactKind::Group => Geometry::rectangle(&bounds),
            _ => shadow.clone(),
        };
        let footprint = scene.create_shape(footprints, footprint_shape, style.footprint())?;

        let (border_shape, border_style) = match kind {
            ArtefactKind::Rectangle => (
                Geometry::rectangle(&bounds.expand(style.margin)),
                style.border(),
            ),
            ArtefactKind::Circle => (
                Geometry::circle(bounds.center(), border_radius(&bounds, style.margin)),
                style.border(),
            ),
            ArtefactKind::Group => (
                Geometry::rectangle(&bounds.expand(style.margin)),
                style.border().dashed(),
            ),
        };
        let border = scene.create_shape(overlay, border_shape, border_style)?;

        let mut handles = SmallVec::new();
        for role in handle_roles(kind, shadow) {
            let Some(position) = handle_position(kind, &bounds, role, style.margin) else {
                continue;
            };
            let half = style.handle_size / 2.0;
            let square = Bounds::new(
                position.x - half,
                position.y - half,
                position.x + half,
                position.y + half,
            );
            let node = scene.create_shape(overlay, Geometry::rectangle(&square), style.handle())?;
            handles.push(Handle {
                node,
                role,
                position,
            });
        }

        Ok(Self {
            border,
            handles,
            footprint,
        })
    }

    /// Moves every decoration node along with the artefact.
    pub fn transform<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        m: &drawkit_core::Affine,
    ) -> Result<()> {
        scene.transform(self.border, m)?;
        scene.transform(self.footprint, m)?;
        for handle in &mut self.handles {
            scene.transform(handle.node, m)?;
            handle.position = m.apply(handle.position);
        }
        Ok(())
    }

    pub fn remove<S: SceneAdapter>(self, scene: &mut S) -> Result<()> {
        scene.remove(self.border)?;
        scene.remove(self.footprint)?;
        for handle in self.handles {
            scene.remove(handle.node)?;
        }
        Ok(())
    }

    pub fn handle_at(&self, node: NodeId) -> Option<&Handle> {
        self.handles.iter().find(|h| h.node == node)
    }

    pub fn handle(&self, role: HandleRole) -> Option<&Handle> {
        self.handles.iter().find(|h| h.role == role)
    }

    /// All scene nodes owned by the overlay.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.border, self.footprint]
            .into_iter()
            .chain(self.handles.iter().map(|h| h.node))
    }
}
