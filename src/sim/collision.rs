//! Collision response against the tile grid and the world rectangle
//!
//! Tile collision samples the four box corners and snaps the offending edge
//! to the nearest tile boundary. It runs as two ordered passes: the
//! horizontal pass re-samples after the vertical pass has corrected `y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::tilemap::{EMPTY, TileMap};
use crate::floor_mod;

/// Which face of the body made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Result of a tile-map resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapContact {
    /// `Top` for a ceiling, `Bottom` for a floor
    pub vertical: Option<Side>,
    /// `Left` or `Right` wall
    pub horizontal: Option<Side>,
}

impl MapContact {
    pub fn any(&self) -> bool {
        self.vertical.is_some() || self.horizontal.is_some()
    }
}

/// Axis-aligned world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds spanning `[0, width] x [0, height]`
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }
}

/// Result of a world-bounds resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsContact {
    pub vertical: Option<Side>,
    pub horizontal: Option<Side>,
}

/// Solidity of the four sampled corners
#[derive(Debug, Clone, Copy)]
struct Corners {
    top_left: bool,
    top_right: bool,
    bottom_left: bool,
    bottom_right: bool,
}

impl Corners {
    /// Sample the box corners, with the bottom raised by `bottom_inset`.
    fn sample(map: &TileMap, body: &Entity, bottom_inset: f32) -> Self {
        let (l, r, t) = (body.left(), body.right(), body.top());
        let b = body.bottom() - bottom_inset;
        let solid = |x: f32, y: f32| map.tile_at(x, y) != EMPTY;
        Self {
            top_left: solid(l, t),
            top_right: solid(r, t),
            bottom_left: solid(l, b),
            bottom_right: solid(r, b),
        }
    }
}

impl Entity {
    /// Push the body out of solid tiles, vertical pass first.
    pub fn resolve_map_collision(&mut self, map: &TileMap) -> MapContact {
        let vertical = self.resolve_vertical(map);
        let horizontal = self.resolve_horizontal(map);
        MapContact {
            vertical,
            horizontal,
        }
    }

    fn resolve_vertical(&mut self, map: &TileMap) -> Option<Side> {
        let tile = map.tile_size();
        let c = Corners::sample(map, self, 0.0);

        if c.top_left || c.top_right {
            self.pos.y += tile - floor_mod(self.top(), tile);
            self.vel.y = 0.0;
            Some(Side::Top)
        } else if c.bottom_left || c.bottom_right {
            self.pos.y -= floor_mod(self.bottom(), tile);
            self.vel.y = 0.0;
            self.airborne = false;
            Some(Side::Bottom)
        } else {
            self.airborne = true;
            None
        }
    }

    fn resolve_horizontal(&mut self, map: &TileMap) -> Option<Side> {
        let tile = map.tile_size();
        // One pixel up so the floor we stand on doesn't read as a wall
        let c = Corners::sample(map, self, 1.0);

        if c.top_left || c.bottom_left {
            self.pos.x += tile - floor_mod(self.left(), tile);
            self.vel.x = 0.0;
            Some(Side::Left)
        } else if c.top_right || c.bottom_right {
            self.pos.x -= floor_mod(self.right(), tile);
            self.vel.x = 0.0;
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Keep the body inside `bounds`, reflecting velocity into the wall.
    ///
    /// Only floor contact grounds the body; a ceiling or no contact leaves
    /// it airborne.
    pub fn resolve_world_bounds(&mut self, bounds: &WorldBounds) -> BoundsContact {
        let mut contact = BoundsContact::default();

        if self.left() < bounds.min.x {
            self.pos.x += bounds.min.x - self.left();
            if self.vel.x < 0.0 {
                self.bounce_x();
            }
            contact.horizontal = Some(Side::Left);
        } else if self.right() > bounds.max.x {
            self.pos.x -= self.right() - bounds.max.x;
            if self.vel.x > 0.0 {
                self.bounce_x();
            }
            contact.horizontal = Some(Side::Right);
        }

        if self.top() < bounds.min.y {
            self.pos.y += bounds.min.y - self.top();
            if self.vel.y < 0.0 {
                self.bounce_y();
            }
            self.airborne = true;
            contact.vertical = Some(Side::Top);
        } else if self.bottom() >= bounds.max.y {
            self.pos.y -= self.bottom() - bounds.max.y;
            if self.vel.y > 0.0 {
                self.bounce_y();
            }
            self.airborne = false;
            contact.vertical = Some(Side::Bottom);
        } else {
            self.airborne = true;
        }

        contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityId;
    use crate::tuning::MotionTuning;
    use proptest::prelude::*;

    fn floor_map() -> TileMap {
        // 10x7 tiles of 32px with only the bottom row solid (top edge y = 192)
        let mut rows = vec![vec![0; 10]; 7];
        rows[6] = vec![1; 10];
        TileMap::new(rows, 32.0).expect("rectangular")
    }

    fn body_at(x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(EntityId(1), Vec2::new(x, y), Vec2::new(w, h), MotionTuning::default())
    }

    #[test]
    fn test_lands_on_floor() {
        let map = floor_map();
        let mut e = body_at(160.0, 179.0, 30.0, 30.0); // bottom at 194
        e.vel.y = 2.0;
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.vertical, Some(Side::Bottom));
        assert_eq!(contact.horizontal, None);
        assert_eq!(e.bottom(), 192.0);
        assert_eq!(e.vel.y, 0.0);
        assert!(!e.airborne);
    }

    #[test]
    fn test_falling_body_settles_on_floor_top() {
        // Dropped from (160, 100) with vy = 2, integrating until it lands
        let map = floor_map();
        let config = crate::PhysicsConfig::default();
        let mut e = body_at(160.0, 100.0, 30.0, 30.0);
        e.vel.y = 2.0;
        for _ in 0..60 {
            e.integrate(&config);
            e.resolve_map_collision(&map);
            if !e.airborne {
                break;
            }
        }
        assert!(!e.airborne);
        assert_eq!(e.bottom(), 192.0);
        assert_eq!(e.vel.y, 0.0);
        assert_eq!(e.pos.x, 160.0);
    }

    #[test]
    fn test_ceiling_pushes_down_to_boundary() {
        let mut rows = vec![vec![0; 10]; 7];
        rows[2][4] = 1; // y 64..96, x 128..160
        let map = TileMap::new(rows, 32.0).expect("rectangular");
        let mut e = body_at(150.0, 105.0, 20.0, 20.0); // top at 95
        e.vel.y = -6.0;
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.vertical, Some(Side::Top));
        assert_eq!(e.top(), 96.0);
        assert_eq!(e.vel.y, 0.0);
        // Ceiling contact does not ground
        assert!(e.airborne);
    }

    #[test]
    fn test_free_fall_marks_airborne() {
        let map = floor_map();
        let mut e = body_at(160.0, 50.0, 30.0, 30.0);
        e.airborne = false;
        let contact = e.resolve_map_collision(&map);
        assert!(!contact.any());
        assert!(e.airborne);
    }

    #[test]
    fn test_wall_on_right_pushes_left() {
        let mut rows = vec![vec![0; 10]; 7];
        rows[6] = vec![1; 10];
        rows[5][6] = 1; // x 192..224, y 160..192
        let map = TileMap::new(rows, 32.0).expect("rectangular");
        // Standing on the floor, taller than the one-tile wall, right edge
        // 3px into it
        let mut e = body_at(180.0, 172.0, 30.0, 40.0);
        e.vel.x = 3.0;
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.vertical, Some(Side::Bottom));
        assert_eq!(contact.horizontal, Some(Side::Right));
        assert_eq!(e.right(), 192.0);
        assert_eq!(e.vel.x, 0.0);
    }

    #[test]
    fn test_wall_on_left_pushes_right() {
        let mut rows = vec![vec![0; 10]; 7];
        rows[6] = vec![1; 10];
        rows[5][2] = 1; // x 64..96, y 160..192
        let map = TileMap::new(rows, 32.0).expect("rectangular");
        let mut e = body_at(110.0, 172.0, 30.0, 40.0); // left at 95
        e.vel.x = -4.0;
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.horizontal, Some(Side::Left));
        assert_eq!(e.left(), 96.0);
        assert_eq!(e.vel.x, 0.0);
    }

    #[test]
    fn test_wall_at_head_height_reads_as_ceiling() {
        // A tile beside the top corner is indistinguishable from a ceiling
        let mut rows = vec![vec![0; 10]; 7];
        rows[6] = vec![1; 10];
        rows[5][6] = 1;
        let map = TileMap::new(rows, 32.0).expect("rectangular");
        let mut e = body_at(180.0, 177.0, 30.0, 30.0); // top-right in the wall
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.vertical, Some(Side::Top));
        assert_eq!(e.top(), 192.0);
    }

    #[test]
    fn test_floor_is_not_a_wall() {
        // Exactly resting: bottom corners sit on row 6, the inset keeps the
        // horizontal pass in row 5
        let map = floor_map();
        let mut e = body_at(100.0, 177.0, 30.0, 30.0);
        e.vel.x = 5.0;
        let contact = e.resolve_map_collision(&map);
        assert_eq!(contact.vertical, Some(Side::Bottom));
        assert_eq!(contact.horizontal, None);
        assert_eq!(e.vel.x, 5.0);
    }

    #[test]
    fn test_tile_collision_does_not_bounce() {
        let map = floor_map();
        let mut e = body_at(160.0, 180.0, 30.0, 30.0);
        e.vel.y = 9.0;
        e.resolve_map_collision(&map);
        assert_eq!(e.vel.y, 0.0);
    }

    #[test]
    fn test_world_bounds_left_bounce() {
        let bounds = WorldBounds::from_size(320.0, 200.0);
        let mut e = body_at(14.0, 100.0, 30.0, 30.0); // left at -1
        e.vel.x = -3.0;
        let contact = e.resolve_world_bounds(&bounds);
        assert_eq!(contact.horizontal, Some(Side::Left));
        assert_eq!(e.pos.x, 15.0);
        assert_eq!(e.vel.x, 1.5);
    }

    #[test]
    fn test_world_bounds_right_no_bounce_when_moving_away() {
        let bounds = WorldBounds::from_size(320.0, 200.0);
        let mut e = body_at(310.0, 100.0, 30.0, 30.0); // right at 325
        e.vel.x = -2.0;
        e.resolve_world_bounds(&bounds);
        assert_eq!(e.right(), 320.0);
        assert_eq!(e.vel.x, -2.0);
    }

    #[test]
    fn test_world_bounds_floor_grounds_and_ceiling_does_not() {
        let bounds = WorldBounds::from_size(320.0, 200.0);

        let mut e = body_at(100.0, 190.0, 30.0, 30.0); // bottom at 205
        e.vel.y = 4.0;
        let contact = e.resolve_world_bounds(&bounds);
        assert_eq!(contact.vertical, Some(Side::Bottom));
        assert_eq!(e.bottom(), 200.0);
        assert_eq!(e.vel.y, -2.0);
        assert!(!e.airborne);

        // Resting exactly on the floor still counts as contact
        e.vel.y = 0.0;
        e.resolve_world_bounds(&bounds);
        assert!(!e.airborne);

        let mut e = body_at(100.0, 10.0, 30.0, 30.0); // top at -5
        e.airborne = false;
        e.vel.y = -4.0;
        let contact = e.resolve_world_bounds(&bounds);
        assert_eq!(contact.vertical, Some(Side::Top));
        assert_eq!(e.top(), 0.0);
        assert_eq!(e.vel.y, 2.0);
        assert!(e.airborne);

        let mut e = body_at(100.0, 100.0, 30.0, 30.0);
        e.airborne = false;
        let contact = e.resolve_world_bounds(&bounds);
        assert_eq!(contact, BoundsContact::default());
        assert!(e.airborne);
    }

    #[test]
    fn test_world_bounds_respects_nonzero_min() {
        let bounds = WorldBounds::new(Vec2::new(50.0, 0.0), Vec2::new(300.0, 200.0));
        let mut e = body_at(60.0, 100.0, 30.0, 30.0); // left at 45
        e.resolve_world_bounds(&bounds);
        assert_eq!(e.left(), 50.0);
    }

    proptest! {
        #[test]
        fn prop_rest_on_flat_floor_is_stable(
            x in 20.0f32..300.0,
            w in 2.0f32..30.0,
            h in 2.0f32..60.0,
        ) {
            let map = floor_map();
            let config = crate::PhysicsConfig::default();
            let w = w.round();
            let h = h.round();
            let start_y = 192.0 - h / 2.0;
            let mut e = body_at(x.round(), start_y, w, h);
            e.airborne = false;
            e.integrate(&config);
            e.resolve_map_collision(&map);
            prop_assert_eq!(e.vel.y, 0.0);
            prop_assert!(!e.airborne);
            prop_assert_eq!(e.pos.y, start_y);
        }

        #[test]
        fn prop_ceiling_hit_aligns_top_edge(
            x in 40.0f32..280.0,
            depth in 1u32..20,
            half_h in 2u32..12,
        ) {
            // Solid row 2 spans y 64..96
            let mut rows = vec![vec![0u8; 10]; 7];
            rows[2] = vec![1; 10];
            let map = TileMap::new(rows, 32.0).expect("rectangular");
            let h = (half_h * 2) as f32;
            let mut e = body_at(x, 96.0 - depth as f32 + h / 2.0, 16.0, h);
            e.vel.y = -5.0;
            e.resolve_map_collision(&map);
            prop_assert_eq!(floor_mod(e.top(), 32.0), 0.0);
            prop_assert_eq!(e.vel.y, 0.0);
        }
    }
}
