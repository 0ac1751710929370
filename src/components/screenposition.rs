//! Screen-space position component.
//!
//! The [`ScreenPosition`] component stores where a tile actor's pivot lands on
//! screen, in pixels. It is written by
//! [`tile_screen_system`](crate::systems::ground::tile_screen_system) from the
//! actor's continuous tile position and read by the host renderer.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Screen-space position (pivot) for an entity.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPosition {
    /// 2D coordinates in screen pixels.
    pub pos: Vec2,
    /// Projection depth from the tile transform (not the draw order).
    pub depth: f32,
}

impl ScreenPosition {
    /// Create a ScreenPosition from x and y.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            depth: 0.0,
        }
    }

    /// X coordinate.
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f32 {
        self.pos.y
    }
}
