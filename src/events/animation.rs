//! Animation playback events.
//!
//! [`animation_system`](crate::systems::animation::animation_system) turns the
//! callback frames and the completion of an
//! [`AnimationController`](crate::components::animation::AnimationController)
//! into these events so game logic can observe them.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<AnimationCallbackEvent>| {
//!     if trigger.event().name == "footstep" {
//!         // play a sound, spawn dust, ...
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

/// A `Callback` frame event was reached.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationCallbackEvent {
    pub entity: Entity,
    /// Name given to the callback in the clip.
    pub name: String,
}

/// A non-looping clip played past its last frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDoneEvent {
    pub entity: Entity,
}
