//! Ball kinetics: one discrete step against a collision registry
//!
//! Each step plans a path from the current center along the velocity, asks
//! the registry for the first impact, and if the ball's edge would reach it
//! adopts the obstacle's response velocity before moving. The new position
//! is committed unconditionally, so a very fast ball can tunnel through a
//! thin obstacle.

use serde::{Deserialize, Serialize};

use super::error::{GeometryError, ensure_finite};
use super::geometry::{LineSegment, Point, Velocity};
use super::registry::CollisionRegistry;

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No impact within reach; moved along the unchanged velocity
    Free,
    /// Bounced off an obstacle before moving
    Colliding {
        point: Point,
        /// Registration index of the obstacle that was struck
        obstacle: usize,
        previous: Velocity,
    },
}

impl StepOutcome {
    pub fn is_collision(&self) -> bool {
        matches!(self, StepOutcome::Colliding { .. })
    }
}

/// A moving circular body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBall")]
pub struct Ball {
    center: Point,
    radius: f64,
    velocity: Velocity,
}

#[derive(Deserialize)]
struct RawBall {
    center: Point,
    radius: f64,
    velocity: Velocity,
}

impl TryFrom<RawBall> for Ball {
    type Error = GeometryError;

    fn try_from(raw: RawBall) -> Result<Self, Self::Error> {
        Self::new(raw.center, raw.radius, raw.velocity)
    }
}

impl Ball {
    pub fn new(center: Point, radius: f64, velocity: Velocity) -> Result<Self, GeometryError> {
        ensure_finite("ball center x", center.x)?;
        ensure_finite("ball center y", center.y)?;
        ensure_finite("ball velocity dx", velocity.dx)?;
        ensure_finite("ball velocity dy", velocity.dy)?;
        if ensure_finite("ball radius", radius)? <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self {
            center,
            radius,
            velocity,
        })
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Path from the current center to where this step would end
    pub fn planned_path(&self) -> LineSegment {
        LineSegment::new(self.center, self.velocity.apply_to(self.center))
    }

    /// Advance one frame against `registry`
    pub fn advance_one_step(&mut self, registry: &CollisionRegistry<'_>) -> StepOutcome {
        let mut outcome = StepOutcome::Free;

        if let Some(hit) = registry.closest_collision(&self.planned_path()) {
            if self.center.distance(hit.point) < self.radius {
                let previous = self.velocity;
                self.velocity = hit.owner.respond_to_hit(hit.point, previous);
                log::debug!(
                    "ball hit obstacle #{} at ({:.2}, {:.2}): ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                    hit.index,
                    hit.point.x,
                    hit.point.y,
                    previous.dx,
                    previous.dy,
                    self.velocity.dx,
                    self.velocity.dy
                );
                outcome = StepOutcome::Colliding {
                    point: hit.point,
                    obstacle: hit.index,
                    previous,
                };
            }
        }

        self.center = self.velocity.apply_to(self.center);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collidable::{Block, Paddle, PaddleTuning, Wall};
    use crate::sim::geometry::Tolerance;
    use crate::sim::rect::Rectangle;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Rectangle {
        Rectangle::from_corners(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    #[test]
    fn test_rejects_bad_radius() {
        let v = Velocity::new(1.0, 1.0);
        assert_eq!(
            Ball::new(Point::new(0.0, 0.0), 0.0, v),
            Err(GeometryError::NonPositiveRadius(0.0))
        );
        assert!(Ball::new(Point::new(0.0, 0.0), -3.0, v).is_err());
        assert!(Ball::new(Point::new(0.0, 0.0), f64::NAN, v).is_err());
        assert!(Ball::new(Point::new(f64::INFINITY, 0.0), 5.0, v).is_err());
    }

    #[test]
    fn test_deserialize_checks_radius() {
        let ball = Ball::new(Point::new(10.0, 20.0), 4.0, Velocity::new(1.0, -1.0)).unwrap();
        let json = serde_json::to_string(&ball).unwrap();
        assert_eq!(serde_json::from_str::<Ball>(&json).unwrap(), ball);

        let zero = r#"{
            "center": { "x": 0.0, "y": 0.0 },
            "radius": 0.0,
            "velocity": { "dx": 1.0, "dy": 1.0 }
        }"#;
        assert!(serde_json::from_str::<Ball>(zero).is_err());
    }

    #[test]
    fn test_free_step_moves_along_velocity() {
        let registry = CollisionRegistry::new();
        let mut ball = Ball::new(Point::new(400.0, 300.0), 15.0, Velocity::new(1.0, 4.0)).unwrap();
        assert_eq!(ball.advance_one_step(&registry), StepOutcome::Free);
        assert_eq!(ball.center(), Point::new(401.0, 304.0));
        assert_eq!(ball.velocity(), Velocity::new(1.0, 4.0));
    }

    #[test]
    fn test_distant_impact_does_not_bounce() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        let mut ball = Ball::new(Point::new(400.0, 300.0), 15.0, Velocity::new(1.0, 4.0)).unwrap();
        assert!(!ball.advance_one_step(&registry).is_collision());
        assert_eq!(ball.velocity(), Velocity::new(1.0, 4.0));
    }

    #[test]
    fn test_left_wall_reflection() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        let mut ball = Ball::new(Point::new(5.0, 300.0), 10.0, Velocity::new(-2.0, 3.0)).unwrap();

        let outcome = ball.advance_one_step(&registry);
        assert!(outcome.is_collision());
        assert_eq!(ball.velocity(), Velocity::new(2.0, 3.0));
        assert_eq!(ball.center(), Point::new(7.0, 303.0));
        if let StepOutcome::Colliding { point, previous, obstacle } = outcome {
            assert!(point.approx_eq(Point::new(0.0, 307.5), Tolerance::default()));
            assert_eq!(previous, Velocity::new(-2.0, 3.0));
            assert_eq!(obstacle, 0);
        }
    }

    #[test]
    fn test_no_persistent_colliding_state() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        let mut ball = Ball::new(Point::new(5.0, 300.0), 10.0, Velocity::new(-2.0, 3.0)).unwrap();
        assert!(ball.advance_one_step(&registry).is_collision());
        // Now heading right, away from the wall it just struck
        assert_eq!(ball.advance_one_step(&registry), StepOutcome::Free);
        assert_eq!(ball.velocity(), Velocity::new(2.0, 3.0));
    }

    #[test]
    fn test_nearest_obstacle_handles_the_hit() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let block = Block::new(rect(100.0, 100.0, 150.0, 120.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        registry.register(&block);

        // Rising straight into the block's bottom edge
        let mut ball = Ball::new(Point::new(125.0, 130.0), 15.0, Velocity::new(0.0, -4.0)).unwrap();
        let outcome = ball.advance_one_step(&registry);
        assert!(matches!(outcome, StepOutcome::Colliding { obstacle: 1, .. }));
        assert_eq!(ball.velocity(), Velocity::new(0.0, 4.0));
        assert_eq!(ball.center(), Point::new(125.0, 134.0));
    }

    #[test]
    fn test_paddle_bounce() {
        let paddle =
            Paddle::new(rect(360.0, 500.0, 440.0, 530.0), PaddleTuning::default()).unwrap();
        let mut registry = CollisionRegistry::new();
        registry.register(&paddle);
        let mut ball = Ball::new(Point::new(400.0, 490.0), 15.0, Velocity::new(1.0, 4.0)).unwrap();

        assert!(ball.advance_one_step(&registry).is_collision());
        let expected = Velocity::from_angle_and_speed(360.0, 5.0);
        // (402.5, 500) lands in the middle zone
        assert!(ball.velocity().approx_eq(expected, Tolerance::default()));
        assert!(ball.center().y < 490.0);
    }

    #[test]
    fn test_stationary_ball_stays_put() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        let mut ball = Ball::new(Point::new(3.0, 3.0), 10.0, Velocity::default()).unwrap();
        assert_eq!(ball.advance_one_step(&registry), StepOutcome::Free);
        assert_eq!(ball.center(), Point::new(3.0, 3.0));
    }

    #[test]
    fn test_many_steps_stay_inside_frame() {
        let frame = Wall::new(rect(0.0, 0.0, 800.0, 600.0));
        let mut registry = CollisionRegistry::new();
        registry.register(&frame);
        let mut ball = Ball::new(Point::new(400.0, 300.0), 15.0, Velocity::new(3.0, -4.0)).unwrap();
        for _ in 0..5_000 {
            ball.advance_one_step(&registry);
            let c = ball.center();
            assert!(c.x > 0.0 && c.x < 800.0, "escaped at {c:?}");
            assert!(c.y > 0.0 && c.y < 600.0, "escaped at {c:?}");
        }
    }
}
