//! Curve system.
//!
//! Advances every [`Curve`](crate::components::curve::Curve) component with
//! the frame delta from [`WorldTime`](crate::resources::worldtime::WorldTime)
//! and writes the value into the scalar named by the entity's
//! [`CurveTarget`](crate::components::curve::CurveTarget).
//!
//! When a curve finishes, a
//! [`CurveFinishedEvent`](crate::events::curve::CurveFinishedEvent) is
//! triggered for its entity.

use bevy_ecs::prelude::*;

use crate::components::curve::{Curve, CurveTarget};
use crate::components::rotation::Rotation;
use crate::components::tileactor::TileActor;
use crate::events::curve::CurveFinishedEvent;
use crate::resources::worldtime::WorldTime;

/// Advance curves and apply their values.
///
/// Paused or finished curves are skipped and leave their target untouched.
pub fn curve_system(
    world_time: Res<WorldTime>,
    mut query: Query<(
        Entity,
        &mut Curve,
        Option<&CurveTarget>,
        Option<&mut TileActor>,
        Option<&mut Rotation>,
    )>,
    mut commands: Commands,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut curve, target, actor, rotation) in query.iter_mut() {
        if !curve.is_running() || curve.is_done() {
            continue;
        }
        let finished = curve.update(dt);
        let value = curve.value();

        match (target, actor, rotation) {
            (Some(CurveTarget::TileI), Some(mut actor), _) => actor.tile_position.x = value,
            (Some(CurveTarget::TileJ), Some(mut actor), _) => actor.tile_position.y = value,
            (Some(CurveTarget::TileHeight), Some(mut actor), _) => actor.tile_position.z = value,
            (Some(CurveTarget::Rotation), _, Some(mut rotation)) => rotation.degrees = value,
            _ => {}
        }

        if finished {
            commands.trigger(CurveFinishedEvent {
                entity,
                target: target.copied(),
                value,
            });
        }
    }
}
