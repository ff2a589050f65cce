//! Axis-aligned rectangle boundaries
//!
//! A rectangle is stored as its top-left and bottom-right corners (y grows
//! downward). Once built, only its x position may change.

use serde::{Deserialize, Serialize};

use super::error::{GeometryError, ensure_finite};
use super::geometry::{LineSegment, Point, Tolerance};

/// One side of a rectangle, in boundary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// All edges in the fixed order used by [`Rectangle::boundary_segments`]
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Left and right edges are vertical
    pub fn is_vertical(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRectangle")]
pub struct Rectangle {
    top_left: Point,
    bottom_right: Point,
}

#[derive(Deserialize)]
struct RawRectangle {
    top_left: Point,
    bottom_right: Point,
}

impl TryFrom<RawRectangle> for Rectangle {
    type Error = GeometryError;

    fn try_from(raw: RawRectangle) -> Result<Self, Self::Error> {
        Self::from_corners(raw.top_left, raw.bottom_right)
    }
}

impl Rectangle {
    /// Build from two opposite corners
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Result<Self, GeometryError> {
        ensure_finite("top-left x", top_left.x)?;
        ensure_finite("top-left y", top_left.y)?;
        ensure_finite("bottom-right x", bottom_right.x)?;
        ensure_finite("bottom-right y", bottom_right.y)?;
        if top_left.x > bottom_right.x || top_left.y > bottom_right.y {
            return Err(GeometryError::InvertedCorners {
                top_x: top_left.x,
                top_y: top_left.y,
                bottom_x: bottom_right.x,
                bottom_y: bottom_right.y,
            });
        }
        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Build from the top-left corner and a width/height extent
    pub fn from_origin_and_size(
        top_left: Point,
        width: f64,
        height: f64,
    ) -> Result<Self, GeometryError> {
        ensure_finite("width", width)?;
        ensure_finite("height", height)?;
        if width < 0.0 || height < 0.0 {
            return Err(GeometryError::NegativeExtent { width, height });
        }
        Self::from_corners(
            top_left,
            Point::new(top_left.x + width, top_left.y + height),
        )
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.top_left.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.bottom_right.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.top_left.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom_right.y
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    /// Inclusive containment, widened by epsilon
    pub fn contains_point(&self, p: Point, tolerance: Tolerance) -> bool {
        tolerance.within(p.x, self.left(), self.right())
            && tolerance.within(p.y, self.top(), self.bottom())
    }

    /// A single boundary segment
    pub fn segment(&self, edge: Edge) -> LineSegment {
        let top_right = Point::new(self.right(), self.top());
        let bottom_left = Point::new(self.left(), self.bottom());
        match edge {
            Edge::Top => LineSegment::new(self.top_left, top_right),
            Edge::Right => LineSegment::new(top_right, self.bottom_right),
            Edge::Bottom => LineSegment::new(self.bottom_right, bottom_left),
            Edge::Left => LineSegment::new(bottom_left, self.top_left),
        }
    }

    /// The four sides as a closed clockwise loop: top, right, bottom, left
    pub fn boundary_segments(&self) -> [LineSegment; 4] {
        Edge::ALL.map(|edge| self.segment(edge))
    }

    /// Edges that `p` lies on, within tolerance and inside each edge's span
    ///
    /// A corner point lies on two edges.
    pub fn edges_at(&self, p: Point, tolerance: Tolerance) -> impl Iterator<Item = Edge> + '_ {
        Edge::ALL.into_iter().filter(move |&edge| {
            let in_x_span = tolerance.within(p.x, self.left(), self.right());
            let in_y_span = tolerance.within(p.y, self.top(), self.bottom());
            match edge {
                Edge::Top => tolerance.approx_eq(p.y, self.top()) && in_x_span,
                Edge::Bottom => tolerance.approx_eq(p.y, self.bottom()) && in_x_span,
                Edge::Left => tolerance.approx_eq(p.x, self.left()) && in_y_span,
                Edge::Right => tolerance.approx_eq(p.x, self.right()) && in_y_span,
            }
        })
    }

    /// Shift horizontally; the only mutation a rectangle allows
    pub fn translate_x(&mut self, dx: f64) {
        self.top_left.x += dx;
        self.bottom_right.x += dx;
    }
}
