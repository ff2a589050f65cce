//! Obstacles a ball can strike
//!
//! Every obstacle pairs a rectangular boundary with a rule for how an
//! incoming velocity changes on impact. Walls and blocks mirror the velocity
//! component perpendicular to the struck edge; the paddle banks the ball at
//! an angle chosen by where along its top edge the impact landed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{GeometryError, ensure_finite};
use super::geometry::{Point, Tolerance, Velocity};
use super::rect::Rectangle;
use crate::consts::*;

/// Capability shared by every obstacle kind
pub trait Collidable: fmt::Debug {
    /// Current boundary, also the geometry a renderer draws
    fn boundary(&self) -> Rectangle;

    /// New velocity for a body that struck `point` while moving at `incoming`
    fn respond_to_hit(&self, point: Point, incoming: Velocity) -> Velocity;

    /// Whether the obstacle may be removed once hit
    ///
    /// Nothing removes obstacles yet; this marks the ones a level could clear.
    fn is_destructible(&self) -> bool {
        false
    }
}

/// Mirror `incoming` off whichever edges of `rect` contain `point`
///
/// Vertical edges flip dx, horizontal edges flip dy, a corner flips both.
/// A point on no edge leaves the velocity unchanged.
pub fn reflect_off_boundary(
    rect: &Rectangle,
    point: Point,
    incoming: Velocity,
    tolerance: Tolerance,
) -> Velocity {
    let (mut vertical, mut horizontal) = (false, false);
    for edge in rect.edges_at(point, tolerance) {
        if edge.is_vertical() {
            vertical = true;
        } else {
            horizontal = true;
        }
    }

    let mut velocity = incoming;
    if vertical {
        velocity = velocity.reflect_x();
    }
    if horizontal {
        velocity = velocity.reflect_y();
    }
    velocity
}

/// Arena frame edge or any other fixed, indestructible barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    rect: Rectangle,
    #[serde(default)]
    tolerance: Tolerance,
}

impl Wall {
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Collidable for Wall {
    fn boundary(&self) -> Rectangle {
        self.rect
    }

    fn respond_to_hit(&self, point: Point, incoming: Velocity) -> Velocity {
        reflect_off_boundary(&self.rect, point, incoming, self.tolerance)
    }
}

/// A brick in the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    rect: Rectangle,
    #[serde(default)]
    tolerance: Tolerance,
}

impl Block {
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Collidable for Block {
    fn boundary(&self) -> Rectangle {
        self.rect
    }

    fn respond_to_hit(&self, point: Point, incoming: Velocity) -> Velocity {
        reflect_off_boundary(&self.rect, point, incoming, self.tolerance)
    }

    fn is_destructible(&self) -> bool {
        true
    }
}

/// Paddle bounce and movement parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    /// Number of equal-width zones across the top edge
    pub zones: usize,
    /// Bounce heading for the leftmost zone (degrees, 0° = up, clockwise)
    pub base_angle: f64,
    /// Heading added per zone to the right
    pub angle_step: f64,
    /// Ball speed after any top-edge bounce
    pub bounce_speed: f64,
    /// Horizontal distance per movement command
    pub move_speed: f64,
    /// Extra distance added when the paddle wraps to the other side
    pub wrap_margin: f64,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            zones: PADDLE_ZONES,
            base_angle: PADDLE_BASE_ANGLE,
            angle_step: PADDLE_ANGLE_STEP,
            bounce_speed: PADDLE_BOUNCE_SPEED,
            move_speed: PADDLE_MOVE_SPEED,
            wrap_margin: PADDLE_WRAP_MARGIN,
        }
    }
}

impl PaddleTuning {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.zones == 0 {
            return Err(GeometryError::NonPositive {
                what: "paddle zone count",
                value: 0.0,
            });
        }
        ensure_finite("paddle base angle", self.base_angle)?;
        ensure_finite("paddle angle step", self.angle_step)?;
        ensure_finite("paddle move speed", self.move_speed)?;
        ensure_finite("paddle wrap margin", self.wrap_margin)?;
        if ensure_finite("paddle bounce speed", self.bounce_speed)? <= 0.0 {
            return Err(GeometryError::NonPositive {
                what: "paddle bounce speed",
                value: self.bounce_speed,
            });
        }
        Ok(())
    }

    /// Bounce heading for zone `index`
    pub fn zone_angle(&self, index: usize) -> f64 {
        self.base_angle + index as f64 * self.angle_step
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPaddle")]
pub struct Paddle {
    rect: Rectangle,
    tuning: PaddleTuning,
    tolerance: Tolerance,
}

#[derive(Deserialize)]
struct RawPaddle {
    rect: Rectangle,
    #[serde(default)]
    tuning: PaddleTuning,
    #[serde(default)]
    tolerance: Tolerance,
}

impl TryFrom<RawPaddle> for Paddle {
    type Error = GeometryError;

    fn try_from(raw: RawPaddle) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.rect, raw.tuning)?.with_tolerance(raw.tolerance))
    }
}

impl Paddle {
    pub fn new(rect: Rectangle, tuning: PaddleTuning) -> Result<Self, GeometryError> {
        tuning.validate()?;
        Ok(Self {
            rect,
            tuning,
            tolerance: Tolerance::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tuning(&self) -> &PaddleTuning {
        &self.tuning
    }

    /// Zone of the top edge under `x`, `None` outside the paddle's x span
    pub fn zone_at(&self, x: f64) -> Option<usize> {
        if !self.tolerance.within(x, self.rect.left(), self.rect.right()) {
            return None;
        }
        let width = self.rect.width();
        if width <= 0.0 {
            return Some(0);
        }
        let zones = self.tuning.zones;
        let fraction = ((x - self.rect.left()) / width).clamp(0.0, 1.0);
        Some(((fraction * zones as f64) as usize).min(zones.saturating_sub(1)))
    }

    pub fn translate_x(&mut self, dx: f64) {
        self.rect.translate_x(dx);
    }

    pub fn move_left(&mut self) {
        self.translate_x(-self.tuning.move_speed);
    }

    pub fn move_right(&mut self) {
        self.translate_x(self.tuning.move_speed);
    }

    /// Once the paddle has fully left `[0, arena_width]`, bring it in from the other side
    pub fn wrap_within(&mut self, arena_width: f64) {
        if self.rect.left() > arena_width {
            self.translate_x(-arena_width - self.tuning.wrap_margin);
        } else if self.rect.right() < 0.0 {
            self.translate_x(arena_width + self.tuning.wrap_margin);
        }
    }
}

impl Collidable for Paddle {
    fn boundary(&self) -> Rectangle {
        self.rect
    }

    fn respond_to_hit(&self, point: Point, incoming: Velocity) -> Velocity {
        // Sides and bottom do not redirect
        if !self.tolerance.approx_eq(point.y, self.rect.top()) {
            return incoming;
        }
        match self.zone_at(point.x) {
            Some(zone) => Velocity::from_angle_and_speed(
                self.tuning.zone_angle(zone),
                self.tuning.bounce_speed,
            ),
            None => incoming,
        }
    }
}

/// Any obstacle a world owns, dispatched without boxing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Obstacle {
    Wall(Wall),
    Block(Block),
    Paddle(Paddle),
}

impl Obstacle {
    pub fn as_paddle_mut(&mut self) -> Option<&mut Paddle> {
        match self {
            Obstacle::Paddle(paddle) => Some(paddle),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Obstacle::Wall(_) => "wall",
            Obstacle::Block(_) => "block",
            Obstacle::Paddle(_) => "paddle",
        }
    }
}

impl Collidable for Obstacle {
    fn boundary(&self) -> Rectangle {
        match self {
            Obstacle::Wall(wall) => wall.boundary(),
            Obstacle::Block(block) => block.boundary(),
            Obstacle::Paddle(paddle) => paddle.boundary(),
        }
    }

    fn respond_to_hit(&self, point: Point, incoming: Velocity) -> Velocity {
        match self {
            Obstacle::Wall(wall) => wall.respond_to_hit(point, incoming),
            Obstacle::Block(block) => block.respond_to_hit(point, incoming),
            Obstacle::Paddle(paddle) => paddle.respond_to_hit(point, incoming),
        }
    }

    fn is_destructible(&self) -> bool {
        match self {
            Obstacle::Wall(wall) => wall.is_destructible(),
            Obstacle::Block(block) => block.is_destructible(),
            Obstacle::Paddle(paddle) => paddle.is_destructible(),
        }
    }
}
