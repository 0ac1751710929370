//! Isometric tile engine core.
//!
//! This module exposes the engine's ECS components, resources, systems, and events
//! for use in integration tests and as a reusable library: the tile/screen
//! transform, ground access rules, keyframe curves and frame/event animations.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
