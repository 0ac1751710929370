//! Tile actor component.
//!
//! A [`TileActor`] is an entity standing on the ground grid. Movement code
//! writes a continuous `tile_position`; the
//! [`tile_movement_system`](crate::systems::ground::tile_movement_system)
//! resolves it to an integer cell and applies the ground access rules of
//! [`GroundMap`](crate::resources::groundmap::GroundMap).

use bevy_ecs::prelude::Component;
use glam::{IVec3, Vec3};

/// Entity occupying a cell of the ground grid.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct TileActor {
    /// Continuous position in tile units; `z` is the actor's height.
    pub tile_position: Vec3,
    /// Cell the actor currently occupies, `None` until first placed.
    pub tile_index: Option<IVec3>,
    /// Last position that resolved to an accessible cell.
    pub last_valid_position: Vec3,
    /// Cell the actor was last refused, cleared once it settles on a cell.
    pub blocked_index: Option<IVec3>,
}

impl TileActor {
    pub fn new(i: f32, j: f32, k: f32) -> Self {
        let pos = Vec3::new(i, j, k);
        Self {
            tile_position: pos,
            tile_index: None,
            last_valid_position: pos,
            blocked_index: None,
        }
    }

    /// Cell a continuous position falls into.
    ///
    /// `i` and `j` round to the nearest cell centre, the height floors so an
    /// actor standing on a raised surface stays in that surface's cell.
    pub fn resolve_index(position: Vec3) -> IVec3 {
        IVec3::new(
            position.x.round() as i32,
            position.y.round() as i32,
            position.z.floor() as i32,
        )
    }

    /// Cell the current position falls into.
    pub fn target_index(&self) -> IVec3 {
        Self::resolve_index(self.tile_position)
    }

    pub fn height(&self) -> f32 {
        self.tile_position.z
    }

    pub fn move_to(&mut self, position: Vec3) {
        self.tile_position = position;
    }

    pub fn translate(&mut self, di: f32, dj: f32, dk: f32) {
        self.tile_position += Vec3::new(di, dj, dk);
    }
}
