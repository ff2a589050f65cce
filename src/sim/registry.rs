//! Nearest-impact lookup over registered obstacles
//!
//! The registry borrows its obstacles; whoever owns them (usually a
//! [`World`](crate::world::World)) registers them once before stepping and
//! keeps them alive for the registry's lifetime. Queries never mutate.

use super::collidable::Collidable;
use super::geometry::{LineSegment, Point, Tolerance, Velocity};

/// Sign of one velocity component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

/// Movement quadrant of a velocity
///
/// With both components non-zero this is one of the four quadrants. A zero
/// component leaves that axis unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub x: Sign,
    pub y: Sign,
}

impl Heading {
    pub fn of(velocity: Velocity) -> Self {
        Self {
            x: Sign::of(velocity.dx),
            y: Sign::of(velocity.dy),
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.x == Sign::Zero && self.y == Sign::Zero
    }

    /// Whether `candidate` is not behind a body at `from` moving this way
    pub fn is_ahead(&self, from: Point, candidate: Point, tolerance: Tolerance) -> bool {
        let eps = tolerance.epsilon();
        let x_ok = match self.x {
            Sign::Positive => candidate.x >= from.x - eps,
            Sign::Negative => candidate.x <= from.x + eps,
            Sign::Zero => true,
        };
        let y_ok = match self.y {
            Sign::Positive => candidate.y >= from.y - eps,
            Sign::Negative => candidate.y <= from.y + eps,
            Sign::Zero => true,
        };
        x_ok && y_ok
    }
}

/// The first impact along a path
#[derive(Debug, Clone, Copy)]
pub struct CollisionInfo<'a> {
    /// Where the path meets the owner's boundary
    pub point: Point,
    /// Obstacle whose boundary contains `point`
    pub owner: &'a dyn Collidable,
    /// Registration index of `owner`
    pub index: usize,
    /// Distance from the path start to `point`
    pub distance: f64,
}

/// Registered obstacles, in registration order
#[derive(Debug, Default)]
pub struct CollisionRegistry<'a> {
    collidables: Vec<&'a dyn Collidable>,
    tolerance: Tolerance,
}

impl<'a> CollisionRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            collidables: Vec::new(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Append an obstacle. Registration order breaks distance ties.
    pub fn register(&mut self, collidable: &'a dyn Collidable) {
        self.collidables.push(collidable);
    }

    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a dyn Collidable> + '_ {
        self.collidables.iter().copied()
    }

    /// Closest impact ahead of a body travelling along `trajectory`
    ///
    /// The trajectory runs from the body's position through its next planned
    /// position and is extended without bound. Intersections behind the
    /// body's heading are dropped. Among the rest the one nearest the start
    /// wins; equal distances (within tolerance) go to the obstacle registered
    /// first. A zero-length trajectory never collides.
    pub fn closest_collision(&self, trajectory: &LineSegment) -> Option<CollisionInfo<'a>> {
        if self.collidables.is_empty() || trajectory.is_degenerate(self.tolerance) {
            return None;
        }

        let direction = trajectory.direction();
        let heading = Heading::of(Velocity::new(direction.x, direction.y));
        if heading.is_stationary() {
            return None;
        }

        let eps = self.tolerance.epsilon();
        let mut best: Option<CollisionInfo<'a>> = None;
        for (index, &owner) in self.collidables.iter().enumerate() {
            let Some((point, distance)) = self.nearest_on(owner, trajectory, heading) else {
                continue;
            };
            let closer = best.is_none_or(|current| distance < current.distance - eps);
            if closer {
                best = Some(CollisionInfo {
                    point,
                    owner,
                    index,
                    distance,
                });
            }
        }

        if let Some(hit) = &best {
            log::trace!(
                "closest collision at ({:.3}, {:.3}), obstacle #{}, {:.3} away",
                hit.point.x,
                hit.point.y,
                hit.index,
                hit.distance
            );
        }
        best
    }

    /// Nearest valid crossing of one obstacle's boundary, with its distance
    fn nearest_on(
        &self,
        collidable: &dyn Collidable,
        trajectory: &LineSegment,
        heading: Heading,
    ) -> Option<(Point, f64)> {
        let origin = trajectory.start;
        collidable
            .boundary()
            .boundary_segments()
            .iter()
            .filter_map(|edge| trajectory.ray_intersection(edge, self.tolerance))
            .filter(|&point| heading.is_ahead(origin, point, self.tolerance))
            .map(|point| (point, origin.distance(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collidable::{Block, Wall};
    use crate::sim::rect::Rectangle;
    use proptest::prelude::*;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Rectangle {
        Rectangle::from_corners(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    fn path(x: f64, y: f64, dx: f64, dy: f64) -> LineSegment {
        let start = Point::new(x, y);
        LineSegment::new(start, Velocity::new(dx, dy).apply_to(start))
    }

    #[test]
    fn test_empty_registry_finds_nothing() {
        let registry = CollisionRegistry::new();
        assert!(registry.is_empty());
        for (dx, dy) in [(1.0, 0.0), (-3.0, 2.0), (0.0, -1.0), (0.5, 0.5)] {
            assert!(registry.closest_collision(&path(10.0, 10.0, dx, dy)).is_none());
        }
    }

    #[test]
    fn test_zero_length_path_finds_nothing() {
        let wall = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&wall);
        assert!(registry.closest_collision(&path(400.0, 300.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_nearest_obstacle_wins() {
        let far = Block::new(rect(40.0, 0.0, 45.0, 100.0));
        let near = Block::new(rect(10.0, 0.0, 15.0, 100.0));
        let middle = Block::new(rect(25.0, 0.0, 30.0, 100.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&far);
        registry.register(&near);
        registry.register(&middle);
        assert_eq!(registry.len(), 3);

        let hit = registry.closest_collision(&path(0.0, 50.0, 1.0, 0.0)).unwrap();
        assert_eq!(hit.index, 1);
        assert!(hit.point.approx_eq(Point::new(10.0, 50.0), registry.tolerance()));
        assert!((hit.distance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_candidates_behind_are_dropped() {
        // The line y = x crosses `behind` at (90, 90), closer than `ahead`
        let behind = Block::new(rect(80.0, 80.0, 90.0, 90.0));
        let ahead = Block::new(rect(130.0, 130.0, 140.0, 140.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&behind);
        registry.register(&ahead);

        let hit = registry.closest_collision(&path(100.0, 100.0, 1.0, 1.0)).unwrap();
        assert_eq!(hit.index, 1);
        assert!(hit.point.x >= 100.0 && hit.point.y >= 100.0);
        assert!(hit.point.approx_eq(Point::new(130.0, 130.0), registry.tolerance()));
    }

    #[test]
    fn test_heading_filters_by_quadrant() {
        let tol = Tolerance::default();
        let from = Point::new(100.0, 100.0);
        let down_right = Heading::of(Velocity::new(1.0, 1.0));
        assert!(down_right.is_ahead(from, Point::new(120.0, 130.0), tol));
        assert!(!down_right.is_ahead(from, Point::new(90.0, 130.0), tol));
        assert!(!down_right.is_ahead(from, Point::new(120.0, 90.0), tol));

        let up_left = Heading::of(Velocity::new(-1.0, -1.0));
        assert!(up_left.is_ahead(from, Point::new(50.0, 60.0), tol));
        assert!(!up_left.is_ahead(from, Point::new(150.0, 60.0), tol));

        let straight_down = Heading::of(Velocity::new(0.0, 4.0));
        assert!(straight_down.is_ahead(from, Point::new(0.0, 200.0), tol));
        assert!(!straight_down.is_ahead(from, Point::new(100.0, 50.0), tol));
        assert!(Heading::of(Velocity::default()).is_stationary());
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        // Two obstacles share the edge x = 50
        let first = Block::new(rect(50.0, 0.0, 60.0, 100.0));
        let second = Wall::new(rect(50.0, 20.0, 70.0, 80.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&first);
        registry.register(&second);
        let hit = registry.closest_collision(&path(0.0, 50.0, 2.0, 0.0)).unwrap();
        assert_eq!(hit.index, 0);
        assert!(hit.owner.is_destructible());

        let mut reversed = CollisionRegistry::new();
        reversed.register(&second);
        reversed.register(&first);
        let hit = reversed.closest_collision(&path(0.0, 50.0, 2.0, 0.0)).unwrap();
        assert_eq!(hit.index, 0);
        assert!(!hit.owner.is_destructible());
    }

    #[test]
    fn test_path_extends_past_one_step() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        // From (400, 300) moving (-2, 3): bottom edge at x = 200, long before the left edge
        let hit = registry.closest_collision(&path(400.0, 300.0, -2.0, 3.0)).unwrap();
        assert!(hit.point.approx_eq(Point::new(200.0, 600.0), registry.tolerance()));
    }

    #[test]
    fn test_obstacle_off_the_path_is_missed() {
        let block = Block::new(rect(100.0, 0.0, 150.0, 20.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&block);
        assert!(registry.closest_collision(&path(0.0, 100.0, 1.0, 0.0)).is_none());
        assert_eq!(registry.iter().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_impacts_lie_in_heading_quadrant(
            x in 0.0f64..100.0, y in 0.0f64..100.0,
            dx in 0.1f64..5.0, dy in 0.1f64..5.0,
            flip_x in any::<bool>(), flip_y in any::<bool>(),
            boxes in prop::collection::vec(
                (-200.0f64..300.0, -200.0f64..300.0, 1.0f64..100.0, 1.0f64..100.0),
                1..8,
            ),
        ) {
            let blocks: Vec<Block> = boxes
                .iter()
                .map(|&(bx, by, w, h)| {
                    Block::new(Rectangle::from_origin_and_size(Point::new(bx, by), w, h).unwrap())
                })
                .collect();
            let mut registry = CollisionRegistry::new();
            for block in &blocks {
                registry.register(block);
            }

            let dx = if flip_x { -dx } else { dx };
            let dy = if flip_y { -dy } else { dy };
            let trajectory = path(x, y, dx, dy);
            let eps = registry.tolerance().epsilon();
            if let Some(hit) = registry.closest_collision(&trajectory) {
                let start = trajectory.start;
                prop_assert!((hit.point.x - start.x) * dx.signum() >= -eps, "{:?}", hit.point);
                prop_assert!((hit.point.y - start.y) * dy.signum() >= -eps, "{:?}", hit.point);
                prop_assert!((hit.distance - start.distance(hit.point)).abs() < 1e-6);
            }
        }
    }
}
