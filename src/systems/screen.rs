//! Screen resize system.
//!
//! Monitors [`ScreenSize`] for changes and rebuilds the [`TileTransform`]
//! so tile placement follows the canvas.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::resources::screensize::ScreenSize;
use crate::resources::tiletransform::TileTransform;

/// Rebuild the tile transform when the screen size changes.
///
/// A failed rebuild is logged and the previous transform stays in place.
pub fn apply_screen_resize(screen: Res<ScreenSize>, mut transform: ResMut<TileTransform>) {
    if !screen.is_changed() {
        return;
    }
    let (w, h) = (screen.w as f32, screen.h as f32);
    if transform.screen_size() == (w, h) {
        return;
    }
    match transform.resize(w, h) {
        Ok(()) => info!("Tile transform resized to {}x{}", screen.w, screen.h),
        Err(e) => error!("Failed to resize tile transform: {}", e),
    }
}
