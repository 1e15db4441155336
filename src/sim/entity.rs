//! Physics bodies
//!
//! A body is an axis-aligned box positioned by its center. Control response
//! and integration live here; world-bounds and tile collision are in
//! `collision`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::blocks::CellCoord;
use crate::tuning::{MotionTuning, PhysicsConfig};

/// Stable handle for a body within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Facing, derived from the sign of horizontal velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

/// Movement intents for a single tick, written by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controller {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Carried for the input layer; has no physics effect
    pub move_down: bool,
}

/// What the renderer needs to pick a frame and a blit position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub id: EntityId,
    pub pos: Vec2,
    pub direction: Direction,
    pub airborne: bool,
}

/// A moving body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Center of the bounding box
    pub pos: Vec2,
    /// Position before the last integration step
    pub prev_pos: Vec2,
    pub vel: Vec2,
    size: Vec2,
    pub direction: Direction,
    /// True while not resting on a surface
    pub airborne: bool,
    pub tuning: MotionTuning,
    pub controller: Controller,
    /// Block cells from the last index refresh
    #[serde(default)]
    pub cells: Vec<CellCoord>,
}

impl Entity {
    /// # Panics
    /// If either dimension is not positive.
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, tuning: MotionTuning) -> Self {
        assert!(
            size.x > 0.0 && size.y > 0.0,
            "entity size must be positive, got {size}"
        );
        Self {
            id,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size,
            direction: Direction::default(),
            airborne: true,
            tuning,
            controller: Controller::default(),
            cells: Vec::with_capacity(4),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.half_extents().x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.half_extents().x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_extents().y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_extents().y
    }

    /// Corners in top-left, top-right, bottom-left, bottom-right order
    pub fn corners(&self) -> [Vec2; 4] {
        let (l, r, t, b) = (self.left(), self.right(), self.top(), self.bottom());
        [
            Vec2::new(l, t),
            Vec2::new(r, t),
            Vec2::new(l, b),
            Vec2::new(r, b),
        ]
    }

    /// Update horizontal speed from the controller, then handle jump.
    ///
    /// Friction is not clamped at zero: a speed that is not a multiple of
    /// `decelerate` overshoots and the stop threshold in `integrate` settles it.
    pub fn apply_control(&mut self) {
        let c = self.controller;
        let t = self.tuning;

        if c.move_left && !c.move_right {
            if self.vel.x > -t.max_move_vel {
                self.vel.x -= t.accelerate;
            }
        } else if c.move_right {
            if self.vel.x < t.max_move_vel {
                self.vel.x += t.accelerate;
            }
        } else if self.vel.x > 0.0 {
            self.vel.x -= t.decelerate;
        } else if self.vel.x < 0.0 {
            self.vel.x += t.decelerate;
        }

        if c.jump && !self.airborne {
            self.vel.y = -t.jump_vel;
        }
    }

    /// One explicit Euler step with an implicit dt of 1.
    pub fn integrate(&mut self, config: &PhysicsConfig) {
        if self.airborne {
            self.vel.y += config.gravity;
        }

        if self.vel.x.abs() < config.stop_velocity {
            self.vel.x = 0.0;
        }

        self.prev_pos = self.pos;
        self.pos += self.vel;
    }

    /// Face the way we're moving; keep facing when stopped.
    pub fn update_direction(&mut self) {
        if self.vel.x > 0.0 {
            self.direction = Direction::Right;
        } else if self.vel.x < 0.0 {
            self.direction = Direction::Left;
        }
    }

    #[inline]
    pub fn bounce_x(&mut self) {
        self.vel.x *= -self.tuning.bounce_x;
    }

    #[inline]
    pub fn bounce_y(&mut self) {
        self.vel.y *= -self.tuning.bounce_y;
    }

    pub fn view(&self) -> RenderView {
        RenderView {
            id: self.id,
            pos: self.pos,
            direction: self.direction,
            airborne: self.airborne,
        }
    }

    /// Blend between the last two ticks for rendering (`alpha` in [0, 1])
    pub fn interpolated_pos(&self, alpha: f32) -> Vec2 {
        self.prev_pos.lerp(self.pos, alpha.clamp(0.0, 1.0))
    }
}
