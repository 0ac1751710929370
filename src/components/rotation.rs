use bevy_ecs::prelude::Component;

/// Rotation of the entity's sprite in degrees, set by animations and curves.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}
