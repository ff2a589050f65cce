//! World setup and the per-frame driver
//!
//! The world owns every obstacle and ball. Each frame it applies paddle
//! input, registers its obstacles (in a fixed order) into a fresh registry
//! and advances every ball once. Balls never collide with each other, so the
//! order they step in does not matter.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{BlockLayout, PhysicsConfig};
use crate::sim::{
    Ball, Block, Collidable, CollisionRegistry, GeometryError, Obstacle, Paddle, Point,
    Rectangle, StepOutcome, Tolerance, Velocity, Wall,
};

/// Paddle commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

/// All simulated state
#[derive(Debug, Clone)]
pub struct World {
    arena: Rectangle,
    tolerance: Tolerance,
    obstacles: Vec<Obstacle>,
    balls: Vec<Ball>,
    paddle_index: Option<usize>,
    frame: u64,
}

impl World {
    /// Empty world over `arena`. The arena itself is not registered.
    pub fn new(arena: Rectangle, tolerance: Tolerance) -> Self {
        Self {
            arena,
            tolerance,
            obstacles: Vec::new(),
            balls: Vec::new(),
            paddle_index: None,
            frame: 0,
        }
    }

    /// The standard level: staircase blocks, arena frame, paddle and two balls
    pub fn classic(config: &PhysicsConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        let tolerance = config.tolerance()?;
        let arena = Rectangle::from_origin_and_size(
            Point::new(0.0, 0.0),
            config.arena_width,
            config.arena_height,
        )?;
        let mut world = Self::new(arena, tolerance);

        for rect in staircase_blocks(&config.blocks)? {
            world.register_obstacle(Obstacle::Block(Block::new(rect).with_tolerance(tolerance)));
        }
        world.register_obstacle(Obstacle::Wall(Wall::new(arena).with_tolerance(tolerance)));

        let paddle_rect = Rectangle::from_origin_and_size(
            Point::new(config.paddle.x, config.paddle.y),
            config.paddle.width,
            config.paddle.height,
        )?;
        let paddle = Paddle::new(paddle_rect, config.paddle_tuning)?.with_tolerance(tolerance);
        world.register_obstacle(Obstacle::Paddle(paddle));

        let mut rng = Pcg32::seed_from_u64(config.seed);
        let jitter = config.launch_jitter_degrees;
        for spawn in &config.balls {
            let mut velocity = Velocity::new(spawn.dx, spawn.dy);
            if jitter > 0.0 {
                let offset = rng.random_range(-jitter..=jitter);
                velocity = Velocity::from_angle_and_speed(
                    velocity.angle_degrees() + offset,
                    velocity.speed(),
                );
            }
            let ball = Ball::new(Point::new(spawn.x, spawn.y), config.ball_radius, velocity)?;
            world.spawn_ball(ball);
        }

        log::info!(
            "Classic world: {} blocks, {} obstacles, {} balls, arena {}x{}",
            world.obstacles.iter().filter(|o| matches!(o, Obstacle::Block(_))).count(),
            world.obstacles.len(),
            world.balls.len(),
            config.arena_width,
            config.arena_height
        );
        Ok(world)
    }

    /// Add an obstacle; returns its registration index
    pub fn register_obstacle(&mut self, obstacle: Obstacle) -> usize {
        let index = self.obstacles.len();
        if matches!(obstacle, Obstacle::Paddle(_)) && self.paddle_index.is_none() {
            self.paddle_index = Some(index);
        }
        self.obstacles.push(obstacle);
        index
    }

    pub fn spawn_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    pub fn arena(&self) -> Rectangle {
        self.arena
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        match self.obstacles.get(self.paddle_index?) {
            Some(Obstacle::Paddle(paddle)) => Some(paddle),
            _ => None,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Registry over every obstacle, in registration order
    pub fn registry(&self) -> CollisionRegistry<'_> {
        build_registry(&self.obstacles, self.tolerance)
    }

    /// Advance one frame; returns each ball's outcome in ball order
    pub fn step(&mut self, input: &FrameInput) -> Vec<StepOutcome> {
        self.frame += 1;

        let arena_width = self.arena.width();
        if let Some(paddle) = self
            .paddle_index
            .and_then(|index| self.obstacles.get_mut(index))
            .and_then(Obstacle::as_paddle_mut)
        {
            if input.left {
                paddle.move_left();
            }
            if input.right {
                paddle.move_right();
            }
            paddle.wrap_within(arena_width);
        }

        let registry = build_registry(&self.obstacles, self.tolerance);
        let outcomes: Vec<StepOutcome> = self
            .balls
            .iter_mut()
            .map(|ball| ball.advance_one_step(&registry))
            .collect();

        for outcome in &outcomes {
            if let StepOutcome::Colliding { obstacle, .. } = outcome {
                log::debug!(
                    "frame {}: {} #{} struck",
                    self.frame,
                    self.obstacles[*obstacle].kind_name(),
                    obstacle
                );
            }
        }
        outcomes
    }

    /// Input that steers the paddle under the lowest ball still heading down
    pub fn autopilot_input(&self) -> FrameInput {
        let Some(paddle) = self.paddle() else {
            return FrameInput::default();
        };
        let target = self
            .balls
            .iter()
            .filter(|ball| ball.velocity().dy > 0.0)
            .max_by(|a, b| a.center().y.total_cmp(&b.center().y));
        let Some(ball) = target else {
            return FrameInput::default();
        };

        let paddle_center = paddle.boundary().center().x;
        let dead_zone = paddle.tuning().move_speed;
        let dx = ball.center().x - paddle_center;
        FrameInput {
            left: dx < -dead_zone,
            right: dx > dead_zone,
        }
    }
}

fn build_registry(obstacles: &[Obstacle], tolerance: Tolerance) -> CollisionRegistry<'_> {
    let mut registry = CollisionRegistry::with_tolerance(tolerance);
    for obstacle in obstacles {
        registry.register(obstacle);
    }
    registry
}

/// Block rectangles for a staircase layout, row by row, left to right
pub fn staircase_blocks(layout: &BlockLayout) -> Result<Vec<Rectangle>, GeometryError> {
    let mut rects = Vec::with_capacity(layout.block_count()?);
    for row in 0..layout.rows {
        let len = layout.row_len(row)?;
        if len == 0 {
            break;
        }
        let start = layout.first_x + row as f64 * layout.block_width;
        let y = layout.first_y + row as f64 * layout.block_height;
        for i in 0..len {
            rects.push(Rectangle::from_origin_and_size(
                Point::new(start + i as f64 * layout.block_width, y),
                layout.block_width,
                layout.block_height,
            )?);
        }
    }
    Ok(rects)
}
