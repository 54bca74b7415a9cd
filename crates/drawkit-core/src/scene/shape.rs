//! Node geometry and its lyon path rendering.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent, Winding};

use crate::constants::FLATTENING_TOLERANCE;
use crate::geometry::{Affine, Bounds, Corner, Point};

/// Geometry carried by a scene node.
///
/// Leaf geometry is stored in the coordinate space of the node's parent, so
/// transforming a leaf bakes the matrix into its points. Containers keep a
/// matrix instead and never carry geometry of their own.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Closed polygon. Rectangles are four points ordered bottom-left,
    /// top-left, top-right, bottom-right.
    Polygon(Vec<Point>),
    /// Open polyline, used for guides.
    Polyline(Vec<Point>),
    /// Circle; `angle` tracks accumulated rotation in degrees.
    Circle {
        center: Point,
        radius: f64,
        angle: f64,
    },
    /// Group or layer root.
    Container,
}

impl Geometry {
    pub fn rectangle(bounds: &Bounds) -> Self {
        Geometry::Polygon(vec![
            bounds.corner(Corner::BottomLeft),
            bounds.corner(Corner::TopLeft),
            bounds.corner(Corner::TopRight),
            bounds.corner(Corner::BottomRight),
        ])
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Geometry::Circle {
            center,
            radius,
            angle: 0.0,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Geometry::Container)
    }

    /// Vertices of polygons and polylines; empty for other kinds.
    pub fn points(&self) -> &[Point] {
        match self {
            Geometry::Polygon(points) | Geometry::Polyline(points) => points,
            _ => &[],
        }
    }

    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match self {
            Geometry::Polygon(points) | Geometry::Polyline(points) => Some(points),
            _ => None,
        }
    }

    /// Axis-aligned bounds in the geometry's own space. `None` for containers.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Polygon(points) | Geometry::Polyline(points) => {
                Bounds::from_points(points.iter().copied())
            }
            Geometry::Circle { center, radius, .. } => Some(Bounds::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            )),
            Geometry::Container => None,
        }
    }

    /// Bakes `m` into the geometry. Circles only follow similarity transforms.
    pub fn transform(&mut self, m: &Affine) {
        match self {
            Geometry::Polygon(points) | Geometry::Polyline(points) => {
                for p in points.iter_mut() {
                    *p = m.apply(*p);
                }
            }
            Geometry::Circle {
                center,
                radius,
                angle,
            } => {
                *center = m.apply(*center);
                *radius *= m.scale_factor();
                *angle += m.rotation_degrees();
            }
            Geometry::Container => {}
        }
    }

    pub fn transformed(&self, m: &Affine) -> Geometry {
        let mut copy = self.clone();
        copy.transform(m);
        copy
    }

    /// Snaps coordinates to a multiple of `precision`.
    pub fn rounded(&self, precision: f64) -> Geometry {
        match self {
            Geometry::Polygon(points) => {
                Geometry::Polygon(points.iter().map(|p| p.rounded(precision)).collect())
            }
            Geometry::Polyline(points) => {
                Geometry::Polyline(points.iter().map(|p| p.rounded(precision)).collect())
            }
            Geometry::Circle {
                center,
                radius,
                angle,
            } => Geometry::Circle {
                center: center.rounded(precision),
                radius: (radius / precision).round() * precision,
                angle: *angle,
            },
            Geometry::Container => Geometry::Container,
        }
    }

    pub fn approx_eq(&self, other: &Geometry, epsilon: f64) -> bool {
        match (self, other) {
            (Geometry::Polygon(a), Geometry::Polygon(b))
            | (Geometry::Polyline(a), Geometry::Polyline(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.approx_eq(q, epsilon))
            }
            (
                Geometry::Circle {
                    center: c1,
                    radius: r1,
                    ..
                },
                Geometry::Circle {
                    center: c2,
                    radius: r2,
                    ..
                },
            ) => c1.approx_eq(c2, epsilon) && (r1 - r2).abs() <= epsilon,
            (Geometry::Container, Geometry::Container) => true,
            _ => false,
        }
    }

    /// Renders the geometry as a lyon path. `None` for containers and
    /// degenerate point lists.
    pub fn to_path(&self) -> Option<Path> {
        let mut builder = Path::builder();
        match self {
            Geometry::Polygon(points) | Geometry::Polyline(points) => {
                let (first, rest) = points.split_first()?;
                builder.begin(point(first.x as f32, first.y as f32));
                for p in rest {
                    builder.line_to(point(p.x as f32, p.y as f32));
                }
                builder.end(matches!(self, Geometry::Polygon(_)));
            }
            Geometry::Circle { center, radius, .. } => {
                builder.add_circle(
                    point(center.x as f32, center.y as f32),
                    *radius as f32,
                    Winding::Positive,
                );
            }
            Geometry::Container => return None,
        }
        Some(builder.build())
    }

    /// Whether the geometry encloses an area that can be filled.
    pub fn is_closed(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::Circle { .. })
    }
}

/// Shortest distance from `p` to the outline of `path`.
pub(crate) fn distance_to_outline(path: &Path, p: Point) -> f64 {
    let mut best = f64::INFINITY;
    for event in path.iter().flattened(FLATTENING_TOLERANCE) {
        let (from, to) = match event {
            PathEvent::Line { from, to } => (from, to),
            PathEvent::End {
                last,
                first,
                close: true,
            } => (last, first),
            _ => continue,
        };
        let a = Point::new(from.x as f64, from.y as f64);
        let b = Point::new(to.x as f64, to.y as f64);
        best = best.min(distance_to_segment(p, a, b));
    }
    best
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&(a + ab * t))
}
