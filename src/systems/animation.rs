//! Animation system.
//!
//! [`animation_system`] drives every
//! [`AnimationController`](crate::components::animation::AnimationController)
//! attached to an entity with a [`Sprite`](crate::components::sprite::Sprite).
//!
//! # Animation Flow
//!
//! 1. A clip is queued with `AnimationController::with_clip` or `play`
//! 2. On its next run the system starts the clip, firing the start frame's
//!    events; playback time starts counting on the following frame
//! 3. Each later run advances playback by the world delta, applying sprite,
//!    flip and rotation events to the entity
//! 4. Callback frames become [`AnimationCallbackEvent`]s and the end of a
//!    non-looping clip an [`AnimationDoneEvent`]
//!
//! # Related
//!
//! - [`crate::components::animation::AnimationController`] – playback state
//! - [`crate::components::sprite::SpriteRig`] – the sprite delegate

use bevy_ecs::prelude::*;

use crate::components::animation::{AnimationController, AnimationTick};
use crate::components::rotation::Rotation;
use crate::components::sprite::{Sprite, SpriteRig};
use crate::events::animation::{AnimationCallbackEvent, AnimationDoneEvent};
use crate::resources::worldtime::WorldTime;

/// Start queued clips and advance running ones.
pub fn animation_system(
    time: Res<WorldTime>,
    mut query: Query<(
        Entity,
        &mut AnimationController,
        &mut Sprite,
        Option<&mut Rotation>,
    )>,
    mut commands: Commands,
) {
    for (entity, mut controller, mut sprite, mut rotation) in query.iter_mut() {
        let mut rig = SpriteRig {
            sprite: &mut *sprite,
            rotation: rotation.as_deref_mut(),
        };
        let tick = match controller.take_pending() {
            Some(data) => controller.start(&data, &mut rig),
            None if controller.is_done() => continue,
            None => controller.update(time.delta, &mut rig),
        };
        emit_tick(&mut commands, entity, tick);
    }
}

fn emit_tick(commands: &mut Commands, entity: Entity, tick: AnimationTick) {
    for name in tick.callbacks {
        commands.trigger(AnimationCallbackEvent { entity, name });
    }
    if tick.finished {
        commands.trigger(AnimationDoneEvent { entity });
    }
}
