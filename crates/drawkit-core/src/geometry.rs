//! Plane geometry primitives: points, axis-aligned bounds, named corners and
//! affine matrices.
//!
//! The canvas uses screen orientation: `y` grows downwards, so the "top" of a
//! bounds is its minimum `y`.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A point (or displacement) on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Snaps both coordinates to a multiple of `precision`.
    pub fn rounded(&self, precision: f64) -> Point {
        let scale = precision.recip();
        Point::new(
            (self.x * scale).round() / scale,
            (self.y * scale).round() / scale,
        )
    }

    pub fn approx_eq(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Named corner of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Corners in clockwise order starting at the top left.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// The corner sharing this corner's x coordinate.
    pub fn vertical_neighbour(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomLeft,
            Corner::TopRight => Corner::BottomRight,
            Corner::BottomRight => Corner::TopRight,
            Corner::BottomLeft => Corner::TopLeft,
        }
    }

    /// The corner sharing this corner's y coordinate.
    pub fn horizontal_neighbour(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::TopRight,
            Corner::TopRight => Corner::TopLeft,
            Corner::BottomRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::BottomRight,
        }
    }

    pub fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLeft => write!(f, "top-left"),
            Self::TopRight => write!(f, "top-right"),
            Self::BottomRight => write!(f, "bottom-right"),
            Self::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates bounds from two corners, normalising their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Creates bounds from an origin and a size. Negative sizes are normalised.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest bounds containing every point, or `None` for an empty set.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.min_x, self.min_y),
            Corner::TopRight => Point::new(self.max_x, self.min_y),
            Corner::BottomRight => Point::new(self.max_x, self.max_y),
            Corner::BottomLeft => Point::new(self.min_x, self.max_y),
        }
    }

    /// Name of the corner closest to `point`.
    pub fn nearest_corner(&self, point: Point) -> Corner {
        let mut best = Corner::TopLeft;
        let mut best_distance = f64::INFINITY;
        for corner in Corner::ALL {
            let distance = self.corner(corner).distance_to(&point);
            if distance < best_distance {
                best = corner;
                best_distance = distance;
            }
        }
        best
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn approx_eq(&self, other: &Bounds, epsilon: f64) -> bool {
        (self.min_x - other.min_x).abs() <= epsilon
            && (self.min_y - other.min_y).abs() <= epsilon
            && (self.max_x - other.max_x).abs() <= epsilon
            && (self.max_y - other.max_y).abs() <= epsilon
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}, {:.2}, {:.2}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// 2D affine transform stored as a homogeneous 3x3 matrix (column vectors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(Matrix3<f64>);

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Builds a transform mapping `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0))
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Rotation by `degrees` (clockwise on screen) about `center`.
    pub fn rotation_about(degrees: f64, center: Point) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let rotation = Self::new(cos, sin, -sin, cos, 0.0, 0.0);
        Self::translation(-center.x, -center.y)
            .then(&rotation)
            .then(&Self::translation(center.x, center.y))
    }

    /// Uniform scale by `factor` keeping `center` fixed.
    pub fn scale_about(factor: f64, center: Point) -> Self {
        Self::translation(-center.x, -center.y)
            .then(&Self::new(factor, 0.0, 0.0, factor, 0.0, 0.0))
            .then(&Self::translation(center.x, center.y))
    }

    /// Returns the transform that applies `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine(next.0 * self.0)
    }

    pub fn apply(&self, p: Point) -> Point {
        let v = self.0 * Vector3::new(p.x, p.y, 1.0);
        Point::new(v.x, v.y)
    }

    /// Applies only the linear part (no translation).
    pub fn apply_vector(&self, v: Point) -> Point {
        let r = self.0 * Vector3::new(v.x, v.y, 0.0);
        Point::new(r.x, r.y)
    }

    pub fn inverse(&self) -> Option<Affine> {
        self.0.try_inverse().map(Affine)
    }

    /// Geometric mean of the axis scale factors.
    pub fn scale_factor(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coefficients();
        (a * d - b * c).abs().sqrt()
    }

    /// Rotation component in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.0[(1, 0)].atan2(self.0[(0, 0)]).to_degrees()
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Affine::identity(), epsilon)
    }

    pub fn approx_eq(&self, other: &Affine, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Coefficients `[a, b, c, d, e, f]` as accepted by [`Affine::new`].
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.0;
        [
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)],
        ]
    }

    /// Converts to lyon's row-vector transform for path rendering.
    pub fn to_lyon(&self) -> lyon::math::Transform {
        let [a, b, c, d, e, f] = self.coefficients();
        lyon::math::Transform::new(
            a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
        )
    }
}
