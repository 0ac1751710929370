//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – frame/event animation clips and their controller
//! - [`curve`] – keyframe curves driving a single scalar
//! - [`rotation`] – rotation angle in degrees
//! - [`screendepth`] – normalized draw-order depth
//! - [`screenposition`] – projected screen-space position
//! - [`sprite`] – sprite key/flip state and the animation sprite delegate
//! - [`tileactor`] – continuous tile position and occupied cell

pub mod animation;
pub mod curve;
pub mod rotation;
pub mod screendepth;
pub mod screenposition;
pub mod sprite;
pub mod tileactor;
