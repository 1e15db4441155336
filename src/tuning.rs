//! Motion and world tuning
//!
//! Loaded once per session and handed to every body at construction.
//! Nothing here is mutated while the simulation runs.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::blocks::blocks_to_cover;

/// Per-body motion constants. Every body owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Horizontal reflection factor on a world-bounds hit
    pub bounce_x: f32,
    /// Vertical reflection factor on a world-bounds hit
    pub bounce_y: f32,
    /// Horizontal speed gained per tick while a direction is held
    pub accelerate: f32,
    /// Horizontal speed lost per tick with no direction held
    pub decelerate: f32,
    /// Speed past which holding a direction stops adding speed
    pub max_move_vel: f32,
    /// Upward speed set on jump
    pub jump_vel: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            bounce_x: 0.5,
            bounce_y: 0.5,
            accelerate: 0.5,
            decelerate: 0.2,
            max_move_vel: 10.0,
            jump_vel: 16.0,
        }
    }
}

impl MotionTuning {
    /// Player character preset: springy off walls, dead stop on floors.
    pub fn player() -> Self {
        Self {
            bounce_x: 0.9,
            bounce_y: 0.0,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            self.bounce_x,
            self.bounce_y,
            self.accelerate,
            self.decelerate,
            self.max_move_vel,
            self.jump_vel,
        ];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(
                "motion constants must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// World-wide physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Tile edge length of the collision grid
    pub tile_size: f32,
    /// Edge length of a broad-phase block
    pub block_size: f32,
    /// Downward speed added per airborne tick
    pub gravity: f32,
    /// Horizontal speed below which a body snaps to rest
    pub stop_velocity: f32,
    /// Screen extent used to size the block index and default bounds
    pub screen_width: f32,
    pub screen_height: f32,
    /// Motion constants given to bodies spawned without an override
    pub defaults: MotionTuning,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            block_size: BLOCK_SIZE,
            gravity: 1.0,
            stop_velocity: 0.2,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            defaults: MotionTuning::default(),
        }
    }
}

impl PhysicsConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded physics config (tile={}, block={}, gravity={})",
            config.tile_size,
            config.block_size,
            config.gravity
        );
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain floats and structs only, serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::Invalid("tile_size must be positive"));
        }
        if !(self.block_size.is_finite() && self.block_size > self.tile_size) {
            return Err(ConfigError::Invalid(
                "block_size must be larger than tile_size",
            ));
        }
        let screen = [self.screen_width, self.screen_height];
        if !screen.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(ConfigError::Invalid("screen size must be finite and positive"));
        }
        if screen.iter().any(|v| blocks_to_cover(*v, self.block_size).is_none()) {
            return Err(ConfigError::Invalid(
                "screen size needs too many blocks for the block index",
            ));
        }
        if !(self.gravity.is_finite() && self.stop_velocity.is_finite())
            || self.gravity < 0.0
            || self.stop_velocity < 0.0
        {
            return Err(ConfigError::Invalid(
                "gravity and stop_velocity must be finite and non-negative",
            ));
        }
        self.defaults.validate()
    }
}
