//! Plat - physics core for a 2D tile-based platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, tile collision, block index, tick)
//! - `tuning`: Data-driven motion and world constants
//! - `error`: Failures at the level/config loading edges

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, LevelError};
pub use tuning::{MotionTuning, PhysicsConfig};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one unit physics step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default tile edge length in world pixels
    pub const TILE_SIZE: f32 = 32.0;
    /// Default block (broad-phase cell) edge length, coarser than a tile
    pub const BLOCK_SIZE: f32 = 128.0;
    /// Upper limit on block grid columns or rows
    pub const MAX_BLOCKS_PER_AXIS: usize = 4096;

    /// Default logical screen size
    pub const SCREEN_WIDTH: f32 = 320.0;
    pub const SCREEN_HEIGHT: f32 = 200.0;
}

/// Floored remainder, matching integer floor-division semantics for negatives
#[inline]
pub fn floor_mod(value: f32, modulus: f32) -> f32 {
    value.rem_euclid(modulus)
}

/// Grid index of a world coordinate for a cell of edge `size`
#[inline]
pub fn grid_index(coord: f32, size: f32) -> i32 {
    (coord / size).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_mod_negative() {
        assert_eq!(floor_mod(-1.0, 32.0), 31.0);
        assert_eq!(floor_mod(64.0, 32.0), 0.0);
        assert_eq!(floor_mod(70.5, 32.0), 6.5);
    }

    #[test]
    fn test_grid_index_boundary_floors() {
        assert_eq!(grid_index(32.0, 32.0), 1);
        assert_eq!(grid_index(31.999, 32.0), 0);
        assert_eq!(grid_index(-0.5, 32.0), -1);
    }
}
