//! Engine systems.
//!
//! Submodules overview
//! - [`animation`] – start and advance frame/event animations
//! - [`curve`] – advance keyframe curves and apply them to their targets
//! - [`ground`] – tile access transitions and screen projection of actors
//! - [`screen`] – rebuild the tile transform on resize
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod curve;
pub mod ground;
pub mod screen;
pub mod time;
