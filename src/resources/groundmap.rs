//! Ground grid and tile access rules.
//!
//! [`GroundMap`] holds the tile type of every cell of a bounded 3D grid and
//! the entities occupying each cell. Movement code asks
//! [`GroundMap::can_access_tile`] before letting an actor into a cell, then
//! reports the transition through [`GroundMap::on_exit`] and
//! [`GroundMap::on_enter`].
//!
//! Access policy per [`TileKind`]:
//! - `Open` – walkable surface; the actor's height must be within one unit of
//!   the surface height (`k + tile.height`).
//! - `Collidable` – never enterable.
//! - `Free` – always enterable (stairs, doorways, decoration).
//!
//! Empty and out-of-bounds cells are never enterable.

use bevy_ecs::prelude::{Entity, Resource};
use glam::{IVec3, UVec3};
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::tileactor::TileActor;

/// Maximum height difference an actor can step across.
pub const MAX_STEP_HEIGHT: f32 = 1.0;

/// Access behaviour of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Open,
    Collidable,
    Free,
}

/// A single ground tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Sprite key used to draw the tile.
    pub sprite: String,
    /// Surface height above the cell's base, in tile units.
    #[serde(default)]
    pub height: f32,
}

impl Tile {
    pub fn new(kind: TileKind, sprite: impl Into<String>) -> Self {
        Self {
            kind,
            sprite: sprite.into(),
            height: 0.0,
        }
    }
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }
}

/// Bounded 3D grid of tiles plus cell occupancy.
#[derive(Resource, Debug, Clone, Default)]
pub struct GroundMap {
    size: UVec3,
    tiles: FxHashMap<IVec3, Tile>,
    occupants: FxHashMap<IVec3, SmallVec<[Entity; 2]>>,
}

impl GroundMap {
    /// Empty grid of `max_i * max_j * max_k` cells.
    pub fn new(max_i: u32, max_j: u32, max_k: u32) -> Self {
        GroundMap {
            size: UVec3::new(max_i, max_j, max_k),
            tiles: FxHashMap::default(),
            occupants: FxHashMap::default(),
        }
    }

    /// Grid dimensions `(max_i, max_j, max_k)`.
    pub fn size(&self) -> UVec3 {
        self.size
    }

    pub fn in_bounds(&self, index: IVec3) -> bool {
        index.cmpge(IVec3::ZERO).all() && index.cmplt(self.size.as_ivec3()).all()
    }

    /// Place a tile. Returns `false` and ignores it when out of bounds.
    pub fn set_tile(&mut self, index: IVec3, tile: Tile) -> bool {
        if !self.in_bounds(index) {
            debug!("Ignoring tile at {} outside {}", index, self.size);
            return false;
        }
        self.tiles.insert(index, tile);
        true
    }

    /// Fill the `k` layer of the whole grid with copies of `tile`.
    pub fn fill_layer(&mut self, k: i32, tile: &Tile) {
        for j in 0..self.size.y as i32 {
            for i in 0..self.size.x as i32 {
                self.set_tile(IVec3::new(i, j, k), tile.clone());
            }
        }
    }

    pub fn remove_tile(&mut self, index: IVec3) -> Option<Tile> {
        self.tiles.remove(&index)
    }

    pub fn tile(&self, index: IVec3) -> Option<&Tile> {
        self.tiles.get(&index)
    }

    /// Whether `actor` may move into the cell at `index`.
    ///
    /// Depends on the tile and the actor's height only, never on occupancy.
    pub fn can_access_tile(&self, actor: &TileActor, index: IVec3) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        let Some(tile) = self.tiles.get(&index) else {
            return false;
        };
        match tile.kind {
            TileKind::Collidable => false,
            TileKind::Free => true,
            TileKind::Open => {
                let surface = index.z as f32 + tile.height;
                (actor.height() - surface).abs() <= MAX_STEP_HEIGHT
            }
        }
    }

    /// Record `entity` entering the cell at `index`.
    pub fn on_enter(&mut self, entity: Entity, index: IVec3) {
        let cell = self.occupants.entry(index).or_default();
        if !cell.contains(&entity) {
            cell.push(entity);
        }
        debug!("{:?} entered tile {}", entity, index);
    }

    /// Record `entity` leaving the cell at `index`.
    pub fn on_exit(&mut self, entity: Entity, index: IVec3) {
        if let Some(cell) = self.occupants.get_mut(&index) {
            cell.retain(|e| *e != entity);
            if cell.is_empty() {
                self.occupants.remove(&index);
            }
        }
        debug!("{:?} left tile {}", entity, index);
    }

    /// Entities currently in the cell at `index`.
    pub fn occupants(&self, index: IVec3) -> &[Entity] {
        self.occupants
            .get(&index)
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    fn ground() -> GroundMap {
        let mut map = GroundMap::new(4, 4, 2);
        map.fill_layer(0, &Tile::new(TileKind::Open, "grass"));
        map
    }

    #[test]
    fn test_open_tile_allows_actor_at_surface() {
        let map = ground();
        let actor = TileActor::new(0.0, 0.0, 0.0);
        assert!(map.can_access_tile(&actor, IVec3::new(1, 0, 0)));
    }

    #[test]
    fn test_open_tile_rejects_actor_too_far_above() {
        let map = ground();
        let actor = TileActor::new(0.0, 0.0, 1.5);
        assert!(!map.can_access_tile(&actor, IVec3::new(1, 0, 0)));
    }

    #[test]
    fn test_open_tile_height_uses_surface() {
        let mut map = ground();
        map.set_tile(
            IVec3::new(2, 2, 1),
            Tile::new(TileKind::Open, "crate_top").with_height(0.5),
        );
        let low = TileActor::new(0.0, 0.0, 0.0);
        let high = TileActor::new(0.0, 0.0, 1.0);
        // surface at 1.5
        assert!(!map.can_access_tile(&low, IVec3::new(2, 2, 1)));
        assert!(map.can_access_tile(&high, IVec3::new(2, 2, 1)));
    }

    #[test]
    fn test_collidable_always_denies() {
        let mut map = ground();
        map.set_tile(IVec3::new(1, 1, 0), Tile::new(TileKind::Collidable, "rock"));
        let actor = TileActor::new(1.0, 1.0, 0.0);
        assert!(!map.can_access_tile(&actor, IVec3::new(1, 1, 0)));
    }

    #[test]
    fn test_free_always_allows() {
        let mut map = ground();
        map.set_tile(IVec3::new(3, 3, 1), Tile::new(TileKind::Free, "ladder"));
        let actor = TileActor::new(0.0, 0.0, 0.0);
        assert!(map.can_access_tile(&actor, IVec3::new(3, 3, 1)));
    }

    #[test]
    fn test_empty_and_out_of_bounds_deny() {
        let map = ground();
        let actor = TileActor::new(0.0, 0.0, 1.0);
        assert!(!map.can_access_tile(&actor, IVec3::new(0, 0, 1)));
        assert!(!map.can_access_tile(&actor, IVec3::new(-1, 0, 0)));
        assert!(!map.can_access_tile(&actor, IVec3::new(4, 0, 0)));
    }

    #[test]
    fn test_set_tile_out_of_bounds_is_ignored() {
        let mut map = GroundMap::new(2, 2, 1);
        assert!(!map.set_tile(IVec3::new(5, 0, 0), Tile::new(TileKind::Open, "x")));
        assert_eq!(map.tile_count(), 0);
    }

    #[test]
    fn test_enter_and_exit_track_occupants() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut map = ground();
        let cell = IVec3::new(1, 1, 0);

        map.on_enter(a, cell);
        map.on_enter(b, cell);
        map.on_enter(a, cell);
        assert_eq!(map.occupants(cell), &[a, b]);

        map.on_exit(a, cell);
        assert_eq!(map.occupants(cell), &[b]);
        map.on_exit(b, cell);
        assert!(map.occupants(cell).is_empty());
    }
}
