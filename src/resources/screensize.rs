//! Screen size resource.
//!
//! Stores the current canvas dimensions in pixels. The host updates it on
//! resize and [`apply_screen_resize`](crate::systems::screen::apply_screen_resize)
//! rebuilds the tile transform from it.

use bevy_ecs::prelude::Resource;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}
