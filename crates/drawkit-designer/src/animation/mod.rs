//! Animations attached to artefacts.
//!
//! An [`Animation`] is a small state machine (Idle → Active ⇄ Paused → Idle)
//! around a closed set of per-kind behaviours. Behaviours only evolve their
//! properties; the animation turns the resulting pose into geometry, leaving
//! the artefact's shadow untouched so bounds stay those of the shape at rest.

mod bounce;
mod rotate;

use std::fmt;
use std::str::FromStr;

use drawkit_core::constants::ROUNDING_PRECISION;
use drawkit_core::{
    Affine, Bounds, Color, FrameEvent, Geometry, Layer, NodeId, Point, PointerEvent,
    SceneAdapter, SceneError, Style,
};
use drawkit_settings::AnimationSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use bounce::BounceProperties;
pub use rotate::RotateProperties;

use crate::artefact::ArtefactKind;
use crate::error::{DesignerError, Result};
use crate::overlay::OverlayStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Rotate,
    Bounce,
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rotate => write!(f, "rotate"),
            Self::Bounce => write!(f, "bounce"),
        }
    }
}

impl FromStr for AnimationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rotate" => Ok(Self::Rotate),
            "bounce" => Ok(Self::Bounce),
            _ => Err(format!("Unknown animation kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Active,
    Paused,
}

/// Named animation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Number(f64),
    Point(Point),
}

impl Property {
    pub fn number(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: PropertyValue::Number(value),
        }
    }

    pub fn point(name: &str, value: Point) -> Self {
        Self {
            name: name.to_string(),
            value: PropertyValue::Point(value),
        }
    }

    pub(crate) fn as_number(&self) -> Result<f64> {
        match self.value {
            PropertyValue::Number(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid("expected a finite number")),
        }
    }

    pub(crate) fn as_point(&self) -> Result<Point> {
        match self.value {
            PropertyValue::Point(p) if p.x.is_finite() && p.y.is_finite() => Ok(p),
            _ => Err(self.invalid("expected a finite point")),
        }
    }

    pub(crate) fn invalid(&self, reason: &str) -> DesignerError {
        DesignerError::InvalidProperty {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A visual control derived from animation properties, in the artefact's
/// parent space.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleShape {
    pub geometry: Geometry,
    /// Interactive handles can be dragged with the tweak tool; the others are
    /// guides.
    pub interactive: bool,
}

/// Per-kind hooks driven by [`Animation`]. Every hook except [`pose`]
/// defaults to a no-op.
///
/// [`pose`]: Behaviour::pose
pub trait Behaviour {
    /// Seeds the properties from the artefact's rest bounds.
    fn on_init(&mut self, _rest: &Bounds, _defaults: &AnimationSettings) {}
    fn on_start(&mut self) {}
    fn on_pause(&mut self) {}
    /// Drops accumulated progress so that [`Behaviour::pose`] is the identity.
    fn on_stop(&mut self) {}
    fn on_frame(&mut self, _frame: &FrameEvent) {}
    /// Re-expresses stored absolute points under `m`.
    fn on_transform(&mut self, _m: &Affine) {}
    fn on_draw_handles(&self) -> Vec<HandleShape> {
        Vec::new()
    }
    /// Derives new properties from a dragged handle position.
    fn on_update(&mut self, _point: Point) {}
    /// Displacement currently applied to the rest shape.
    fn pose(&self) -> Affine;
    fn properties(&self) -> Vec<Property>;
    fn set_property(&mut self, property: &Property) -> Result<()>;
}

/// Typed properties of every animation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnimationProperties {
    Rotate(RotateProperties),
    Bounce(BounceProperties),
}

impl AnimationProperties {
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Rotate(_) => AnimationKind::Rotate,
            Self::Bounce(_) => AnimationKind::Bounce,
        }
    }

    fn defaults(kind: AnimationKind) -> Self {
        match kind {
            AnimationKind::Rotate => Self::Rotate(RotateProperties::default()),
            AnimationKind::Bounce => Self::Bounce(BounceProperties::default()),
        }
    }

    /// Copy with accumulated progress dropped.
    pub fn at_rest(&self) -> Self {
        let mut rest = self.clone();
        rest.on_stop();
        rest
    }
}

impl Behaviour for AnimationProperties {
    fn on_init(&mut self, rest: &Bounds, defaults: &AnimationSettings) {
        match self {
            Self::Rotate(p) => p.on_init(rest, defaults),
            Self::Bounce(p) => p.on_init(rest, defaults),
        }
    }

    fn on_start(&mut self) {
        match self {
            Self::Rotate(p) => p.on_start(),
            Self::Bounce(p) => p.on_start(),
        }
    }

    fn on_pause(&mut self) {
        match self {
            Self::Rotate(p) => p.on_pause(),
            Self::Bounce(p) => p.on_pause(),
        }
    }

    fn on_stop(&mut self) {
        match self {
            Self::Rotate(p) => p.on_stop(),
            Self::Bounce(p) => p.on_stop(),
        }
    }

    fn on_frame(&mut self, frame: &FrameEvent) {
        match self {
            Self::Rotate(p) => p.on_frame(frame),
            Self::Bounce(p) => p.on_frame(frame),
        }
    }

    fn on_transform(&mut self, m: &Affine) {
        match self {
            Self::Rotate(p) => p.on_transform(m),
            Self::Bounce(p) => p.on_transform(m),
        }
    }

    fn on_draw_handles(&self) -> Vec<HandleShape> {
        match self {
            Self::Rotate(p) => p.on_draw_handles(),
            Self::Bounce(p) => p.on_draw_handles(),
        }
    }

    fn on_update(&mut self, point: Point) {
        match self {
            Self::Rotate(p) => p.on_update(point),
            Self::Bounce(p) => p.on_update(point),
        }
    }

    fn pose(&self) -> Affine {
        match self {
            Self::Rotate(p) => p.pose(),
            Self::Bounce(p) => p.pose(),
        }
    }

    fn properties(&self) -> Vec<Property> {
        match self {
            Self::Rotate(p) => p.properties(),
            Self::Bounce(p) => p.properties(),
        }
    }

    fn set_property(&mut self, property: &Property) -> Result<()> {
        match self {
            Self::Rotate(p) => p.set_property(property),
            Self::Bounce(p) => p.set_property(property),
        }
    }
}

/// Input accepted by [`Animation::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationUpdate {
    /// A handle drag, in world coordinates.
    Pointer(PointerEvent),
    /// Raw properties merged by name.
    Properties(Vec<Property>),
}

/// Everything needed to rebuild an animation elsewhere: properties at rest
/// and whether it was playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSnapshot {
    pub properties: AnimationProperties,
    pub running: bool,
}

impl AnimationSnapshot {
    pub fn kind(&self) -> AnimationKind {
        self.properties.kind()
    }
}

/// The geometry an animation drives.
pub struct AnimationTarget<'a, S: SceneAdapter> {
    pub scene: &'a mut S,
    pub node: NodeId,
    pub kind: ArtefactKind,
    pub shadow: &'a mut Geometry,
}

#[derive(Debug, Clone, PartialEq)]
struct HandleNode {
    node: NodeId,
    interactive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    state: AnimationState,
    properties: AnimationProperties,
    applied: Affine,
    handles: Vec<HandleNode>,
}

impl Animation {
    /// Idle animation with explicit properties.
    pub fn new(properties: AnimationProperties) -> Self {
        Self {
            state: AnimationState::Idle,
            properties: properties.at_rest(),
            applied: Affine::identity(),
            handles: Vec::new(),
        }
    }

    /// Idle animation of `kind` seeded from the rest bounds.
    pub fn init(kind: AnimationKind, rest: &Bounds, defaults: &AnimationSettings) -> Self {
        let mut properties = AnimationProperties::defaults(kind);
        properties.on_init(rest, defaults);
        Self::new(properties)
    }

    pub fn kind(&self) -> AnimationKind {
        self.properties.kind()
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn properties(&self) -> &AnimationProperties {
        &self.properties
    }

    /// Pose currently baked into the geometry.
    pub fn applied(&self) -> Affine {
        self.applied
    }

    /// Active or paused: the geometry may be displaced.
    pub fn is_running(&self) -> bool {
        self.state != AnimationState::Idle
    }

    pub fn snapshot(&self) -> AnimationSnapshot {
        AnimationSnapshot {
            properties: self.properties.at_rest(),
            running: self.state == AnimationState::Active,
        }
    }

    /// Idle or Paused → Active. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if self.state == AnimationState::Active {
            return false;
        }
        self.state = AnimationState::Active;
        self.properties.on_start();
        debug!("Started {} animation", self.kind());
        true
    }

    /// Active → Paused, leaving the geometry where the last frame put it.
    pub fn pause(&mut self) -> bool {
        if self.state != AnimationState::Active {
            return false;
        }
        self.state = AnimationState::Paused;
        self.properties.on_pause();
        debug!("Paused {} animation", self.kind());
        true
    }

    /// Returns the geometry to rest. Safe from any state.
    pub fn stop<S: SceneAdapter>(&mut self, target: AnimationTarget<'_, S>) -> Result<()> {
        self.pause();
        self.properties.on_stop();
        self.state = AnimationState::Idle;
        let AnimationTarget {
            scene,
            node,
            kind,
            shadow,
        } = target;
        match kind {
            ArtefactKind::Group => {
                let inverse = self.applied.inverse().ok_or(SceneError::NonInvertible)?;
                scene.transform(node, &inverse)?;
            }
            ArtefactKind::Rectangle => {
                *shadow = shadow.rounded(ROUNDING_PRECISION);
                scene.set_geometry(node, shadow.clone())?;
            }
            ArtefactKind::Circle => scene.set_geometry(node, shadow.clone())?,
        }
        self.applied = Affine::identity();
        debug!("Stopped {} animation", self.kind());
        Ok(())
    }

    /// Advances an active animation by one frame. Returns whether it moved.
    pub fn frame<S: SceneAdapter>(
        &mut self,
        target: AnimationTarget<'_, S>,
        frame: &FrameEvent,
    ) -> Result<bool> {
        if self.state != AnimationState::Active {
            return Ok(false);
        }
        self.properties.on_frame(frame);
        self.apply_pose(target)?;
        Ok(true)
    }

    /// Follows a transform already applied to the artefact.
    pub fn transform(&mut self, m: &Affine) {
        self.properties.on_transform(m);
        self.applied = self.properties.pose();
    }

    /// Applies a pointer drag or raw properties. `to_parent` maps world
    /// coordinates into the artefact's parent space.
    pub fn update<S: SceneAdapter>(
        &mut self,
        target: AnimationTarget<'_, S>,
        update: &AnimationUpdate,
        to_parent: &Affine,
    ) -> Result<()> {
        match update {
            AnimationUpdate::Pointer(event) => {
                self.properties.on_update(to_parent.apply(event.point));
            }
            AnimationUpdate::Properties(properties) => {
                let mut merged = self.properties.clone();
                for property in properties {
                    merged.set_property(property)?;
                }
                self.properties = merged;
            }
        }
        if !self.is_running() {
            self.properties.on_stop();
        }
        self.apply_pose(target)
    }

    /// Replaces the properties, keeping the playback state.
    pub fn set_properties<S: SceneAdapter>(
        &mut self,
        target: AnimationTarget<'_, S>,
        properties: &AnimationProperties,
    ) -> Result<()> {
        if properties.kind() != self.kind() {
            return Err(DesignerError::InvalidProperty {
                name: "kind".to_string(),
                reason: format!("expected {}, got {}", self.kind(), properties.kind()),
            });
        }
        self.properties = properties.clone();
        if !self.is_running() {
            self.properties.on_stop();
        }
        self.apply_pose(target)
    }

    fn apply_pose<S: SceneAdapter>(&mut self, target: AnimationTarget<'_, S>) -> Result<()> {
        let pose = self.properties.pose();
        match target.kind {
            ArtefactKind::Group => {
                let inverse = self.applied.inverse().ok_or(SceneError::NonInvertible)?;
                target.scene.transform(target.node, &inverse.then(&pose))?;
            }
            _ => target
                .scene
                .set_geometry(target.node, target.shadow.transformed(&pose))?,
        }
        self.applied = pose;
        Ok(())
    }

    /// Redraws the handles in the overlay layer. `to_world` maps the
    /// artefact's parent space to world space.
    pub fn draw_handles<S: SceneAdapter>(
        &mut self,
        scene: &mut S,
        to_world: &Affine,
        style: &OverlayStyle,
    ) -> Result<()> {
        self.clear_handles(scene)?;
        let layer = scene.layer(Layer::Overlay);
        for shape in self.properties.on_draw_handles() {
            let paint = if shape.interactive {
                Style {
                    fill: Some(style.accent),
                    stroke: Some(Color::WHITE),
                    stroke_width: style.stroke_width,
                    ..Style::default()
                }
            } else {
                Style::outline(style.accent, 1.0).dashed().inert()
            };
            let node = scene.create_shape(layer, shape.geometry.transformed(to_world), paint)?;
            self.handles.push(HandleNode {
                node,
                interactive: shape.interactive,
            });
        }
        Ok(())
    }

    pub fn clear_handles<S: SceneAdapter>(&mut self, scene: &mut S) -> Result<()> {
        for handle in self.handles.drain(..) {
            scene.remove(handle.node)?;
        }
        Ok(())
    }

    pub fn has_handles(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Whether `node` is one of this animation's draggable handles.
    pub fn owns_handle(&self, node: NodeId) -> bool {
        self.handles.iter().any(|h| h.interactive && h.node == node)
    }
}

/// Radius of the round marker drawn for point properties.
pub(crate) const MARKER_RADIUS: f64 = 5.0;

pub(crate) fn marker(at: Point) -> HandleShape {
    HandleShape {
        geometry: Geometry::circle(at, MARKER_RADIUS),
        interactive: true,
    }
}
