use drawkit_core::{Affine, Bounds, FrameEvent, Geometry, Point};
use drawkit_settings::AnimationSettings;
use serde::{Deserialize, Serialize};

use super::{marker, Behaviour, HandleShape, Property};
use crate::error::Result;

/// Back-and-forth translation between the rest position and a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BounceProperties {
    /// Rest center in the artefact's parent space.
    pub origin: Point,
    /// Where the center travels to at full progress.
    pub target: Point,
    /// Progress per frame, in `(0, 1]`.
    pub speed: f64,
    /// Position along the path, in `[0, 1]`.
    pub progress: f64,
    /// `1.0` while travelling out, `-1.0` on the way back.
    pub direction: f64,
}

impl Default for BounceProperties {
    fn default() -> Self {
        let defaults = AnimationSettings::default();
        Self {
            origin: Point::ZERO,
            target: Point::new(defaults.bounce_distance, 0.0),
            speed: defaults.bounce_speed,
            progress: 0.0,
            direction: 1.0,
        }
    }
}

impl Behaviour for BounceProperties {
    fn on_init(&mut self, rest: &Bounds, defaults: &AnimationSettings) {
        self.origin = rest.center();
        self.target = self.origin + Point::new(defaults.bounce_distance, 0.0);
        self.speed = defaults.bounce_speed;
        self.on_stop();
    }

    fn on_stop(&mut self) {
        self.progress = 0.0;
        self.direction = 1.0;
    }

    fn on_frame(&mut self, _frame: &FrameEvent) {
        self.progress += self.speed * self.direction;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.direction = -1.0;
        } else if self.progress <= 0.0 {
            self.progress = 0.0;
            self.direction = 1.0;
        }
    }

    fn on_transform(&mut self, m: &Affine) {
        self.origin = m.apply(self.origin);
        self.target = m.apply(self.target);
    }

    fn on_draw_handles(&self) -> Vec<HandleShape> {
        vec![
            HandleShape {
                geometry: Geometry::Polyline(vec![self.origin, self.target]),
                interactive: false,
            },
            marker(self.target),
        ]
    }

    fn on_update(&mut self, point: Point) {
        self.target = point;
    }

    fn pose(&self) -> Affine {
        let offset = (self.target - self.origin) * self.progress;
        Affine::translation(offset.x, offset.y)
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::point("origin", self.origin),
            Property::point("target", self.target),
            Property::number("speed", self.speed),
            Property::number("progress", self.progress),
        ]
    }

    fn set_property(&mut self, property: &Property) -> Result<()> {
        match property.name.as_str() {
            "origin" => self.origin = property.as_point()?,
            "target" => self.target = property.as_point()?,
            "speed" => {
                let speed = property.as_number()?;
                if speed <= 0.0 || speed > 1.0 {
                    return Err(property.invalid("must be within (0, 1]"));
                }
                self.speed = speed;
            }
            "progress" => {
                let progress = property.as_number()?;
                if !(0.0..=1.0).contains(&progress) {
                    return Err(property.invalid("must be within [0, 1]"));
                }
                self.progress = progress;
            }
            _ => return Err(property.invalid("unknown bounce property")),
        }
        Ok(())
    }
}
