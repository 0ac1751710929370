//! ECS resources made available to systems.
//!
//! Overview
//! - `gameconfig` – INI-backed engine settings
//! - `groundmap` – ground tiles, access rules and cell occupancy
//! - `screensize` – current canvas dimensions in pixels
//! - `tiletransform` – tile ↔ screen projection and draw-order depth
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod groundmap;
pub mod screensize;
pub mod tiletransform;
pub mod worldtime;
