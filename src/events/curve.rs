//! Curve completion event.
//!
//! When a [`Curve`](crate::components::curve::Curve) attached to an entity
//! finishes its last pass, [`curve_system`](crate::systems::curve::curve_system)
//! triggers a [`CurveFinishedEvent`] for it.

use bevy_ecs::prelude::*;

use crate::components::curve::CurveTarget;

/// Event emitted when an entity's curve completes.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CurveFinishedEvent {
    pub entity: Entity,
    /// What the curve was driving, if anything.
    pub target: Option<CurveTarget>,
    /// Final value of the curve.
    pub value: f32,
}
