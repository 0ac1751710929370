//! Tile transition events.
//!
//! [`tile_movement_system`](crate::systems::ground::tile_movement_system)
//! triggers these as actors move across the ground grid. For a granted move
//! the order is always [`TileExitEvent`] for the old cell, then
//! [`TileEnterEvent`] for the new one. A denied move triggers
//! [`TileBlockedEvent`] and nothing else.
//!
//! This module also includes [`log_tile_transitions`], an observer that
//! writes every transition to the log.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::IVec3;
use log::debug;

/// An actor entered a cell.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEnterEvent {
    pub entity: Entity,
    pub index: IVec3,
}

/// An actor left a cell.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileExitEvent {
    pub entity: Entity,
    pub index: IVec3,
}

/// An actor tried to move into a cell it cannot access.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBlockedEvent {
    pub entity: Entity,
    /// Cell the actor stays in, `None` if it was never placed.
    pub from: Option<IVec3>,
    pub to: IVec3,
}

/// Observer that logs blocked moves.
pub fn log_tile_blocked(trigger: On<TileBlockedEvent>) {
    let event = trigger.event();
    debug!(
        "{:?} blocked moving {:?} -> {}",
        event.entity, event.from, event.to
    );
}

/// Observer that logs cell entries.
pub fn log_tile_transitions(trigger: On<TileEnterEvent>) {
    let event = trigger.event();
    debug!("{:?} now on tile {}", event.entity, event.index);
}
