//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Unit steps only, paced by `clock::FixedStep`
//! - Stable iteration order (by entity ID)
//! - No rendering, input polling or asset dependencies

pub mod blocks;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use blocks::{BlockIndex, CellCoord};
pub use clock::FixedStep;
pub use collision::{BoundsContact, MapContact, Side, WorldBounds};
pub use entity::{Controller, Direction, Entity, EntityId, RenderView};
pub use state::{CollisionMode, Session, SimEvent};
pub use tick::{TickInput, tick};
pub use tilemap::{EMPTY, TileId, TileMap};
