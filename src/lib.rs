//! Arcade Physics - ball-vs-rectangle collisions for a Breakout-style game
//!
//! Core modules:
//! - `sim`: Collision core (geometry, obstacles, nearest-impact registry, ball stepping)
//! - `config`: JSON-loadable physics and level configuration
//! - `world`: Level setup and the per-frame driver

pub mod config;
pub mod sim;
pub mod world;

pub use config::{ConfigError, PhysicsConfig};
pub use world::{FrameInput, World};

/// Game configuration constants
pub mod consts {
    /// Frames simulated per second by the driver
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 15.0;

    /// Paddle placement
    pub const PADDLE_X: f64 = 360.0;
    pub const PADDLE_Y: f64 = 500.0;
    pub const PADDLE_WIDTH: f64 = 80.0;
    pub const PADDLE_HEIGHT: f64 = 30.0;

    /// Paddle bounce: 5 zones banking from 300° through 60° (0° = straight up)
    pub const PADDLE_ZONES: usize = 5;
    pub const PADDLE_BASE_ANGLE: f64 = 300.0;
    pub const PADDLE_ANGLE_STEP: f64 = 30.0;
    pub const PADDLE_BOUNCE_SPEED: f64 = 5.0;

    /// Paddle movement per frame of input
    pub const PADDLE_MOVE_SPEED: f64 = 5.0;
    pub const PADDLE_WRAP_MARGIN: f64 = 20.0;

    /// Block staircase
    pub const BLOCK_ROWS: usize = 6;
    pub const BLOCK_FIRST_X: f64 = 100.0;
    pub const BLOCK_FIRST_Y: f64 = 0.0;
    pub const BLOCK_RIGHT_LIMIT: f64 = 700.0;
    pub const BLOCK_WIDTH: f64 = 50.0;
    pub const BLOCK_HEIGHT: f64 = 20.0;
    /// Upper bound on blocks a layout may produce
    pub const MAX_BLOCKS: usize = 10_000;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(420.0), 60.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }
}
