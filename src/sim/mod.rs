//! Collision core
//!
//! Pure, single-threaded, step-driven physics. Nothing here renders, reads
//! input or touches the clock:
//! - Geometry values compare through an explicit tolerance
//! - Obstacles are registered once, before any step
//! - Queries never mutate the registry
//! - Each ball step is O(registered obstacles)

pub mod ball;
pub mod collidable;
pub mod error;
pub mod geometry;
pub mod rect;
pub mod registry;

pub use ball::{Ball, StepOutcome};
pub use collidable::{
    Block, Collidable, Obstacle, Paddle, PaddleTuning, Wall, reflect_off_boundary,
};
pub use error::GeometryError;
pub(crate) use error::ensure_finite;
pub use geometry::{Line, LineSegment, Point, Tolerance, Velocity};
pub use rect::{Edge, Rectangle};
pub use registry::{CollisionInfo, CollisionRegistry, Heading, Sign};
