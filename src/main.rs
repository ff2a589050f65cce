//! Arcade Physics headless driver
//!
//! Builds the classic level and runs it for a fixed number of frames with the
//! paddle on autopilot, logging ball positions once per simulated second.
//!
//! Usage: `arcade-physics [config.json] [frames]`

use arcade_physics::consts::FRAMES_PER_SECOND;
use arcade_physics::{PhysicsConfig, World};

/// Frames to run when no count is given (one simulated minute)
const DEFAULT_FRAMES: u64 = 60 * FRAMES_PER_SECOND as u64;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PhysicsConfig::load_or_default(path),
        None => PhysicsConfig::default(),
    };
    let frames = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(frames) => frames,
            Err(err) => {
                log::warn!("Ignoring frame count {raw:?}: {err}");
                DEFAULT_FRAMES
            }
        },
        None => DEFAULT_FRAMES,
    };

    let mut world = match World::classic(&config) {
        Ok(world) => world,
        Err(err) => {
            log::error!("Cannot build world: {err}");
            std::process::exit(1);
        }
    };

    let mut collisions = 0usize;
    for _ in 0..frames {
        let input = world.autopilot_input();
        collisions += world
            .step(&input)
            .iter()
            .filter(|outcome| outcome.is_collision())
            .count();

        if world.frame() % FRAMES_PER_SECOND as u64 == 0 {
            for (i, ball) in world.balls().iter().enumerate() {
                let (c, v) = (ball.center(), ball.velocity());
                log::info!(
                    "t={}s ball {}: pos=({:.1}, {:.1}) vel=({:.2}, {:.2})",
                    world.frame() / FRAMES_PER_SECOND as u64,
                    i,
                    c.x,
                    c.y,
                    v.dx,
                    v.dy
                );
            }
        }
    }

    log::info!("Simulated {} frames, {} collisions", world.frame(), collisions);
}
