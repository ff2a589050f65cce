//! 2D geometric primitives: points, velocities, lines and segments
//!
//! Screen coordinates: x grows to the right, y grows downward. Angles are in
//! degrees, 0° pointing up and increasing clockwise.
//!
//! All equality tests go through an explicit [`Tolerance`] instead of exact
//! float comparison, so drift from repeated velocity application does not
//! break edge membership checks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::error::GeometryError;
use crate::normalize_degrees;

/// Absolute-difference threshold for coordinate comparisons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTolerance")]
pub struct Tolerance {
    epsilon: f64,
}

#[derive(Deserialize)]
struct RawTolerance {
    epsilon: f64,
}

impl TryFrom<RawTolerance> for Tolerance {
    type Error = GeometryError;

    fn try_from(raw: RawTolerance) -> Result<Self, Self::Error> {
        Self::new(raw.epsilon)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}

impl Tolerance {
    pub const DEFAULT_EPSILON: f64 = 1e-7;

    pub fn new(epsilon: f64) -> Result<Self, GeometryError> {
        if epsilon.is_finite() && epsilon > 0.0 {
            Ok(Self { epsilon })
        } else {
            Err(GeometryError::InvalidTolerance(epsilon))
        }
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `|a - b| < epsilon`
    #[inline]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.epsilon
    }

    /// Whether `value` lies in `[lo, hi]`, widened by epsilon on both ends
    #[inline]
    pub fn within(&self, value: f64, lo: f64, hi: f64) -> bool {
        value >= lo - self.epsilon && value <= hi + self.epsilon
    }
}

/// An immutable point in screen space
///
/// `==` is exact and only meant for tests on hand-built values; geometry
/// code compares through [`Point::approx_eq`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        self.to_dvec2().distance(other.to_dvec2())
    }

    /// Both coordinates equal within tolerance
    pub fn approx_eq(&self, other: Point, tolerance: Tolerance) -> bool {
        tolerance.approx_eq(self.x, other.x) && tolerance.approx_eq(self.y, other.y)
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Per-step displacement of a moving body
///
/// As with [`Point`], `==` is exact; use [`Velocity::approx_eq`] for
/// computed values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Build from a heading in degrees (0° = up, clockwise) and a speed
    pub fn from_angle_and_speed(angle_degrees: f64, speed: f64) -> Self {
        let radians = angle_degrees.to_radians();
        Self {
            dx: speed * radians.sin(),
            dy: -speed * radians.cos(),
        }
    }

    /// Heading in degrees, normalized to `[0, 360)`
    pub fn angle_degrees(&self) -> f64 {
        normalize_degrees(self.dx.atan2(-self.dy).to_degrees())
    }

    pub fn speed(&self) -> f64 {
        self.to_dvec2().length()
    }

    /// Returns the moved point; the input is left untouched
    pub fn apply_to(&self, point: Point) -> Point {
        Point::new(point.x + self.dx, point.y + self.dy)
    }

    /// Mirror the horizontal component (struck a vertical edge)
    pub fn reflect_x(&self) -> Self {
        Self::new(-self.dx, self.dy)
    }

    /// Mirror the vertical component (struck a horizontal edge)
    pub fn reflect_y(&self) -> Self {
        Self::new(self.dx, -self.dy)
    }

    pub fn approx_eq(&self, other: Velocity, tolerance: Tolerance) -> bool {
        tolerance.approx_eq(self.dx, other.dx) && tolerance.approx_eq(self.dy, other.dy)
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }
}

/// Infinite line in general form `a·x + b·y = c`
///
/// Unlike slope-intercept form this has no singularity for vertical lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Line through two points. Coincident points give the zero line.
    pub fn through(p: Point, q: Point) -> Self {
        let a = q.y - p.y;
        let b = p.x - q.x;
        Self {
            a,
            b,
            c: a * p.x + b * p.y,
        }
    }

    #[inline]
    fn norm(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Perpendicular distance from `p`
    pub fn distance_to(&self, p: Point) -> f64 {
        let norm = self.norm();
        if norm == 0.0 {
            return f64::INFINITY;
        }
        (self.a * p.x + self.b * p.y - self.c).abs() / norm
    }

    pub fn contains(&self, p: Point, tolerance: Tolerance) -> bool {
        self.distance_to(p) < tolerance.epsilon()
    }

    /// Unique crossing point, or `None` for parallel (or coincident) lines
    pub fn intersection(&self, other: &Line, tolerance: Tolerance) -> Option<Point> {
        let det = self.a * other.b - other.a * self.b;
        // det / (|n1|·|n2|) is the sine of the angle between the lines
        if det.abs() <= tolerance.epsilon() * self.norm() * other.norm() {
            return None;
        }
        let x = (other.b * self.c - self.b * other.c) / det;
        let y = (self.a * other.c - other.a * self.c) / det;
        Some(Point::new(x, y))
    }
}

/// An immutable line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Slope dy/dx, `None` for vertical segments
    pub fn slope(&self) -> Option<f64> {
        let run = self.end.x - self.start.x;
        if run == 0.0 {
            None
        } else {
            Some((self.end.y - self.start.y) / run)
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.slope().is_none()
    }

    pub fn line(&self) -> Line {
        Line::through(self.start, self.end)
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end.to_dvec2() - self.start.to_dvec2()
    }

    /// Shorter than epsilon, i.e. effectively a point
    pub fn is_degenerate(&self, tolerance: Tolerance) -> bool {
        self.length() < tolerance.epsilon()
    }

    /// Whether `p` lies inside the segment's bounding box (widened by epsilon)
    fn spans(&self, p: Point, tolerance: Tolerance) -> bool {
        tolerance.within(p.x, self.start.x.min(self.end.x), self.start.x.max(self.end.x))
            && tolerance.within(p.y, self.start.y.min(self.end.y), self.start.y.max(self.end.y))
    }

    /// Whether `p` lies on this segment, endpoints included
    pub fn contains_point(&self, p: Point, tolerance: Tolerance) -> bool {
        if self.is_degenerate(tolerance) {
            return self.start.approx_eq(p, tolerance);
        }
        self.line().contains(p, tolerance) && self.spans(p, tolerance)
    }

    /// Position of `p` projected onto the segment, 0 at start and 1 at end
    pub fn parameter_of(&self, p: Point) -> f64 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        (p.to_dvec2() - self.start.to_dvec2()).dot(d) / len_sq
    }

    pub fn point_at(&self, t: f64) -> Point {
        Point::from(self.start.to_dvec2() + self.direction() * t)
    }

    pub fn intersects(&self, other: &LineSegment, tolerance: Tolerance) -> bool {
        self.intersection_point(other, tolerance).is_some()
    }

    /// Segment-segment intersection
    ///
    /// Both segments are bounded: a crossing of the infinite lines that lies
    /// outside either segment is no intersection. Collinear overlapping
    /// segments report the lexicographically smallest (x, then y) shared
    /// point, so the result does not depend on argument order.
    pub fn intersection_point(&self, other: &LineSegment, tolerance: Tolerance) -> Option<Point> {
        match (self.is_degenerate(tolerance), other.is_degenerate(tolerance)) {
            (true, true) => {
                return self
                    .start
                    .approx_eq(other.start, tolerance)
                    .then_some(self.start);
            }
            (true, false) => {
                return other
                    .contains_point(self.start, tolerance)
                    .then_some(self.start);
            }
            (false, true) => {
                return self
                    .contains_point(other.start, tolerance)
                    .then_some(other.start);
            }
            (false, false) => {}
        }

        let (mine, theirs) = (self.line(), other.line());
        if let Some(p) = mine.intersection(&theirs, tolerance) {
            return (self.spans(p, tolerance) && other.spans(p, tolerance)).then_some(p);
        }

        // Parallel. Only collinear segments can share points.
        if !(mine.contains(other.start, tolerance) && theirs.contains(self.start, tolerance)) {
            return None;
        }
        let (u0, u1) = (self.parameter_of(other.start), self.parameter_of(other.end));
        let lo = u0.min(u1).max(0.0);
        let hi = u0.max(u1).min(1.0);
        let slack = tolerance.epsilon() / self.length();
        if lo > hi + slack {
            return None;
        }
        let (a, b) = (self.point_at(lo), self.point_at(hi.max(lo)));
        Some(lexicographic_min(a, b))
    }

    /// First crossing of this segment, extended past its end as a ray, with `edge`
    ///
    /// The ray starts at `self.start` and runs through `self.end` without
    /// bound; the edge stays bounded. Parallel and collinear configurations
    /// report no crossing: a path sliding along an edge does not strike it.
    pub fn ray_intersection(&self, edge: &LineSegment, tolerance: Tolerance) -> Option<Point> {
        if self.is_degenerate(tolerance) || edge.is_degenerate(tolerance) {
            return None;
        }
        let p = self.line().intersection(&edge.line(), tolerance)?;
        if !edge.spans(p, tolerance) {
            return None;
        }
        let d = self.direction();
        let along = (p.to_dvec2() - self.start.to_dvec2()).dot(d) / d.length();
        (along >= -tolerance.epsilon()).then_some(p)
    }
}

fn lexicographic_min(a: Point, b: Point) -> Point {
    if (a.x, a.y) <= (b.x, b.y) { a } else { b }
}
