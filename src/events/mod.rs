//! Event types and observers used by the engine.
//!
//! Events provide a decoupled way for systems to report what happened during
//! a frame without depending on the game logic that reacts to it.
//!
//! Submodules:
//! - [`animation`] – animation callbacks and completion
//! - [`curve`] – curve completion
//! - [`tile`] – tile enter/exit/blocked transitions
pub mod animation;
pub mod curve;
pub mod tile;
