use drawkit_core::{Affine, Bounds, FrameEvent, Point};
use drawkit_settings::AnimationSettings;
use serde::{Deserialize, Serialize};

use super::{marker, Behaviour, HandleShape, Property};
use crate::error::Result;

/// Continuous rotation about a movable center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotateProperties {
    /// Pivot in the artefact's parent space.
    pub center: Point,
    /// Degrees per frame; negative spins counter-clockwise.
    pub speed: f64,
    /// Accumulated angle in degrees, within `(-360, 360)`.
    pub angle: f64,
}

impl Default for RotateProperties {
    fn default() -> Self {
        Self {
            center: Point::ZERO,
            speed: AnimationSettings::default().rotate_speed,
            angle: 0.0,
        }
    }
}

impl Behaviour for RotateProperties {
    fn on_init(&mut self, rest: &Bounds, defaults: &AnimationSettings) {
        self.center = rest.center();
        self.speed = defaults.rotate_speed;
        self.angle = 0.0;
    }

    fn on_stop(&mut self) {
        self.angle = 0.0;
    }

    fn on_frame(&mut self, _frame: &FrameEvent) {
        self.angle = (self.angle + self.speed) % 360.0;
    }

    fn on_transform(&mut self, m: &Affine) {
        self.center = m.apply(self.center);
    }

    fn on_draw_handles(&self) -> Vec<HandleShape> {
        vec![marker(self.center)]
    }

    fn on_update(&mut self, point: Point) {
        self.center = point;
    }

    fn pose(&self) -> Affine {
        Affine::rotation_about(self.angle, self.center)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::point("center", self.center),
            Property::number("speed", self.speed),
            Property::number("angle", self.angle),
        ]
    }

    fn set_property(&mut self, property: &Property) -> Result<()> {
        match property.name.as_str() {
            "center" => self.center = property.as_point()?,
            "speed" => self.speed = property.as_number()?,
            "angle" => self.angle = property.as_number()? % 360.0,
            _ => return Err(property.invalid("unknown rotate property")),
        }
        Ok(())
    }
}
