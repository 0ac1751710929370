use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::animation::SpriteController;
use crate::components::rotation::Rotation;

/// Sprite is identified by a key into the host's sprite atlas and its size in pixels.
/// The origin selects the pivot point (in pixels) relative to the sprite's top-left
/// used for placement/rotation when the host draws it.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub key: String,
    pub width: f32,
    pub height: f32,
    pub origin: Vec2,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    pub fn new(key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
            origin: Vec2::new(width / 2.0, height),
            flip_h: false,
            flip_v: false,
        }
    }
}

/// Mutable view over an entity's sprite and optional rotation, handed to
/// animation playback.
pub struct SpriteRig<'a> {
    pub sprite: &'a mut Sprite,
    pub rotation: Option<&'a mut Rotation>,
}

impl SpriteController for SpriteRig<'_> {
    fn set_sprite(&mut self, sprite: &str) {
        self.sprite.key.clear();
        self.sprite.key.push_str(sprite);
    }
    fn flip(&mut self, horizontal: bool, vertical: bool) {
        self.sprite.flip_h = horizontal;
        self.sprite.flip_v = vertical;
    }
    fn rotate(&mut self, degrees: f32) {
        if let Some(rotation) = self.rotation.as_deref_mut() {
            rotation.degrees = degrees;
        }
    }
}
