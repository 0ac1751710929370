//! Ground systems.
//!
//! - [`tile_movement_system`] resolves each [`TileActor`]'s continuous
//!   position to a cell and applies the [`GroundMap`] access rules.
//! - [`tile_screen_system`] projects actors to screen space through the
//!   [`TileTransform`] and writes their draw-order depth.
//!
//! # Transition order
//!
//! For an actor whose resolved cell changed:
//!
//! 1. `GroundMap::can_access_tile` is asked about the new cell (pure query)
//! 2. If granted: `on_exit` for the old cell, then `on_enter` for the new one,
//!    each followed by its [`TileExitEvent`] / [`TileEnterEvent`]
//! 3. If denied: the actor is put back at its last valid position and a
//!    [`TileBlockedEvent`] is triggered, once per refused cell until the
//!    actor settles somewhere again
//!
//! Exit runs after the access check, so `can_access_tile` must not look at
//! occupancy: the moving actor is still listed in its old cell while the
//! check runs.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::screendepth::ScreenDepth;
use crate::components::screenposition::ScreenPosition;
use crate::components::tileactor::TileActor;
use crate::events::tile::{TileBlockedEvent, TileEnterEvent, TileExitEvent};
use crate::resources::groundmap::GroundMap;
use crate::resources::tiletransform::{TileTransform, screen_depth};

/// Move actors between cells according to the ground rules.
pub fn tile_movement_system(
    mut ground: ResMut<GroundMap>,
    mut query: Query<(Entity, &mut TileActor)>,
    mut commands: Commands,
) {
    for (entity, mut actor) in query.iter_mut() {
        let target = actor.target_index();
        if actor.tile_index == Some(target) {
            if actor.last_valid_position != actor.tile_position {
                actor.last_valid_position = actor.tile_position;
            }
            if actor.blocked_index.is_some() {
                actor.blocked_index = None;
            }
            continue;
        }

        if !ground.can_access_tile(&actor, target) {
            let from = actor.tile_index;
            if from.is_some() {
                actor.tile_position = actor.last_valid_position;
            }
            if actor.blocked_index != Some(target) {
                debug!("{:?} denied access to {}", entity, target);
                actor.blocked_index = Some(target);
                commands.trigger(TileBlockedEvent {
                    entity,
                    from,
                    to: target,
                });
            }
            continue;
        }

        if let Some(previous) = actor.tile_index {
            ground.on_exit(entity, previous);
            commands.trigger(TileExitEvent {
                entity,
                index: previous,
            });
        }
        ground.on_enter(entity, target);
        commands.trigger(TileEnterEvent {
            entity,
            index: target,
        });
        actor.tile_index = Some(target);
        actor.last_valid_position = actor.tile_position;
        actor.blocked_index = None;
    }
}

/// Write screen position and draw-order depth of placed actors.
pub fn tile_screen_system(
    transform: Res<TileTransform>,
    ground: Res<GroundMap>,
    mut query: Query<(&TileActor, &mut ScreenPosition, Option<&mut ScreenDepth>)>,
) {
    let size = ground.size();
    for (actor, mut screen, depth) in query.iter_mut() {
        let p = actor.tile_position;
        let projected = transform.to_screen_loc(p.x, p.y, p.z);
        screen.pos = projected.truncate();
        screen.depth = projected.z;

        if let (Some(mut depth), Some(index)) = (depth, actor.tile_index) {
            depth.0 = screen_depth(
                index.x as f32,
                index.y as f32,
                index.z as f32,
                size.x,
                size.y,
                size.z,
            );
        }
    }
}
