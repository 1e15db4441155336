//! Fixed timestep simulation tick
//!
//! Advances every body one unit step in a fixed order:
//! control, integrate, collide, face, re-index.

use super::collision::Side;
use super::entity::Controller;
use super::state::{CollisionMode, Session, SimEvent};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Intents for the player body
    pub player: Controller,
}

/// Advance the session by one tick
pub fn tick(session: &mut Session, input: &TickInput) {
    let Session {
        config,
        map,
        bounds,
        mode,
        blocks,
        entities,
        events,
        time_ticks,
        ..
    } = session;

    if let Some(player) = entities.first_mut() {
        player.controller = input.player;
    }

    for entity in entities.iter_mut() {
        let was_airborne = entity.airborne;
        // Same condition `apply_control` jumps on; a floor bounce is not a jump
        let jumped = entity.controller.jump && !was_airborne;

        entity.apply_control();
        entity.integrate(config);

        // Exactly one collision policy applies per session
        let moving = entity.vel.x != 0.0;
        let (vertical, horizontal) = match (*mode, map.as_ref()) {
            (CollisionMode::Map, Some(map)) => {
                let c = entity.resolve_map_collision(map);
                (c.vertical, c.horizontal)
            }
            _ => {
                let c = entity.resolve_world_bounds(bounds);
                (c.vertical, c.horizontal)
            }
        };

        entity.update_direction();
        blocks.refresh(entity);

        let id = entity.id;
        if jumped {
            log::debug!("{:?} jumped at {}", id, entity.pos);
            events.push(SimEvent::Jumped { id });
        }
        if vertical == Some(Side::Top) {
            events.push(SimEvent::Bumped { id });
        }
        if was_airborne && !entity.airborne {
            log::debug!("{:?} landed at {}", id, entity.pos);
            events.push(SimEvent::Landed { id });
        }
        if let Some(side) = horizontal.filter(|_| moving) {
            events.push(SimEvent::HitWall { id, side });
        }
    }

    *time_ticks += 1;
}
