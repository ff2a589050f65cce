//! Physics and level configuration
//!
//! Loaded from a JSON file; any field left out takes its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{GeometryError, PaddleTuning, Tolerance, ensure_finite};

/// Failure to load a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] GeometryError),
}

/// Initial placement and per-frame velocity of one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSpawn {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Paddle rectangle at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSpawn {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for PaddleSpawn {
    fn default() -> Self {
        Self {
            x: PADDLE_X,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

/// Staircase of block rows
///
/// Row `i` starts `i` blocks further right than row 0 and stops `i` blocks
/// short of `right_limit`, so each row is two blocks narrower than the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockLayout {
    pub rows: usize,
    pub first_x: f64,
    pub first_y: f64,
    pub right_limit: f64,
    pub block_width: f64,
    pub block_height: f64,
}

impl BlockLayout {
    /// Number of whole blocks that fit in `row`
    pub fn row_len(&self, row: usize) -> Result<usize, GeometryError> {
        let inset = row as f64 * self.block_width;
        let span = (self.right_limit - inset) - (self.first_x + inset);
        // Absorb rounding so an exact fit still counts
        let fit = (span / self.block_width + 1e-9).floor();
        if !fit.is_finite() || fit > MAX_BLOCKS as f64 {
            return Err(GeometryError::TooManyBlocks {
                count: fit as usize,
                limit: MAX_BLOCKS,
            });
        }
        Ok(fit.max(0.0) as usize)
    }

    /// Total blocks across all rows, rejected above [`MAX_BLOCKS`]
    pub fn block_count(&self) -> Result<usize, GeometryError> {
        ensure_positive("block width", self.block_width)?;
        ensure_positive("block height", self.block_height)?;
        ensure_finite("block first x", self.first_x)?;
        ensure_finite("block first y", self.first_y)?;
        ensure_finite("block right limit", self.right_limit)?;

        let mut total = 0usize;
        for row in 0..self.rows {
            let len = self.row_len(row)?;
            // Rows only get narrower
            if len == 0 {
                break;
            }
            total += len;
            if total > MAX_BLOCKS {
                return Err(GeometryError::TooManyBlocks {
                    count: total,
                    limit: MAX_BLOCKS,
                });
            }
        }
        Ok(total)
    }
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            rows: BLOCK_ROWS,
            first_x: BLOCK_FIRST_X,
            first_y: BLOCK_FIRST_Y,
            right_limit: BLOCK_RIGHT_LIMIT,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
        }
    }
}

/// Everything needed to build and run a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Coordinate comparison threshold
    pub epsilon: f64,
    pub arena_width: f64,
    pub arena_height: f64,
    pub ball_radius: f64,
    pub balls: Vec<BallSpawn>,
    /// Launch headings are rotated by a seeded random angle in `[-j, j]` degrees
    pub launch_jitter_degrees: f64,
    pub seed: u64,
    pub paddle: PaddleSpawn,
    pub paddle_tuning: PaddleTuning,
    pub blocks: BlockLayout,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            epsilon: Tolerance::DEFAULT_EPSILON,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ball_radius: BALL_RADIUS,
            balls: vec![
                BallSpawn {
                    x: 400.0,
                    y: 300.0,
                    dx: 1.0,
                    dy: 4.0,
                },
                BallSpawn {
                    x: 400.0,
                    y: 350.0,
                    dx: -1.0,
                    dy: -4.0,
                },
            ],
            launch_jitter_degrees: 0.0,
            seed: 0,
            paddle: PaddleSpawn::default(),
            paddle_tuning: PaddleTuning::default(),
            blocks: BlockLayout::default(),
        }
    }
}

impl PhysicsConfig {
    /// Parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    /// Like [`load`](Self::load), falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using default physics config");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tolerance(&self) -> Result<Tolerance, GeometryError> {
        Tolerance::new(self.epsilon)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.tolerance()?;
        ensure_positive("arena width", self.arena_width)?;
        ensure_positive("arena height", self.arena_height)?;
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(self.ball_radius));
        }
        if !self.launch_jitter_degrees.is_finite() || self.launch_jitter_degrees < 0.0 {
            return Err(GeometryError::NonPositive {
                what: "launch jitter",
                value: self.launch_jitter_degrees,
            });
        }
        self.blocks.block_count()?;
        self.paddle_tuning.validate()
    }
}

fn ensure_positive(what: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositive { what, value })
    }
}
