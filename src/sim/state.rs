//! Session state
//!
//! Everything one running level owns: the tile map, bodies, the block index
//! and the configuration they were built from.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::blocks::BlockIndex;
use super::collision::{Side, WorldBounds};
use super::entity::{Entity, EntityId, RenderView};
use super::tilemap::TileMap;
use crate::tuning::{MotionTuning, PhysicsConfig};

/// How bodies are kept out of solid space. Exactly one applies per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Resolve against the tile map
    Map,
    /// Clamp and bounce inside the world rectangle
    Bounds,
}

/// Things that happened during a tick, for audio/animation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Body left the ground under its own jump
    Jumped { id: EntityId },
    /// Body was airborne last tick and is grounded now
    Landed { id: EntityId },
    /// Body was stopped by a wall or the world edge
    HitWall { id: EntityId, side: Side },
    /// Body hit a ceiling or the world top
    Bumped { id: EntityId },
}

/// One level in play
#[derive(Debug)]
pub struct Session {
    pub config: PhysicsConfig,
    pub map: Option<TileMap>,
    pub bounds: WorldBounds,
    pub mode: CollisionMode,
    pub blocks: BlockIndex,
    /// Bodies in ascending id order
    pub entities: Vec<Entity>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<SimEvent>,
    next_id: u32,
}

impl Session {
    /// Start a session. With a map, bodies resolve against tiles and the
    /// bounds follow the map's pixel size; without one they use the screen
    /// rectangle from `config`.
    pub fn new(config: PhysicsConfig, map: Option<TileMap>) -> Self {
        let (mode, bounds) = match &map {
            Some(m) => (
                CollisionMode::Map,
                WorldBounds::from_size(m.pixel_width(), m.pixel_height()),
            ),
            None => (
                CollisionMode::Bounds,
                WorldBounds::from_size(config.screen_width, config.screen_height),
            ),
        };
        let blocks =
            BlockIndex::for_screen(config.screen_width, config.screen_height, config.block_size);
        log::info!("New session: {:?} collision, bounds {:?}", mode, bounds);

        Self {
            config,
            map,
            bounds,
            mode,
            blocks,
            entities: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Override the world rectangle; switches to bounds collision.
    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.bounds = bounds;
        self.mode = CollisionMode::Bounds;
        self
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a body with the configured default tuning
    pub fn spawn(&mut self, pos: Vec2, size: Vec2) -> EntityId {
        let tuning = self.config.defaults;
        self.spawn_with(pos, size, tuning)
    }

    pub fn spawn_with(&mut self, pos: Vec2, size: Vec2, tuning: MotionTuning) -> EntityId {
        let id = self.next_entity_id();
        let mut entity = Entity::new(id, pos, size, tuning);
        self.blocks.refresh(&mut entity);
        log::debug!("Spawned {:?} at {} size {}", id, pos, size);
        self.entities.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The input-driven body: the first one spawned
    pub fn player(&self) -> Option<&Entity> {
        self.entities.first()
    }

    pub fn views(&self) -> Vec<RenderView> {
        self.entities.iter().map(Entity::view).collect()
    }

    /// Hand over and clear the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
