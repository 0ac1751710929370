//! Game configuration resource.
//!
//! Manages engine settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [screen]
//! width = 1280
//! height = 720
//!
//! [tiles]
//! tile_size = 32
//! scale = 2.0
//! depth_scale = 0.0009765625
//!
//! [world]
//! max_i = 16
//! max_j = 16
//! max_k = 4
//!
//! [time]
//! time_scale = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::tiletransform::{
    DEFAULT_DEPTH_SCALE, DEFAULT_SCALE, DEFAULT_TILE_SIZE, TileTransform, TransformError,
};

/// Default safe values for startup
const DEFAULT_SCREEN_WIDTH: u32 = 1280;
const DEFAULT_SCREEN_HEIGHT: u32 = 720;
const DEFAULT_MAX_I: u32 = 16;
const DEFAULT_MAX_J: u32 = 16;
const DEFAULT_MAX_K: u32 = 4;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores screen size, tile projection parameters, world bounds and time
/// scale.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Canvas width in pixels.
    pub screen_width: u32,
    /// Canvas height in pixels.
    pub screen_height: u32,
    /// Source tile size in pixels.
    pub tile_size: f32,
    /// On-screen scale of a tile.
    pub scale: f32,
    /// Projection depth change per tile unit.
    pub depth_scale: f32,
    /// Ground grid bounds.
    pub max_i: u32,
    pub max_j: u32,
    pub max_k: u32,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            scale: DEFAULT_SCALE,
            depth_scale: DEFAULT_DEPTH_SCALE,
            max_i: DEFAULT_MAX_I,
            max_j: DEFAULT_MAX_J,
            max_k: DEFAULT_MAX_K,
            time_scale: DEFAULT_TIME_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: {}x{} screen, tile {}x{} (depth {}), world {}x{}x{}, time_scale={}",
            self.screen_width,
            self.screen_height,
            self.tile_size,
            self.scale,
            self.depth_scale,
            self.max_i,
            self.max_j,
            self.max_k,
            self.time_scale
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [screen] section
        if let Some(width) = config.getuint("screen", "width").ok().flatten() {
            self.screen_width = width as u32;
        }
        if let Some(height) = config.getuint("screen", "height").ok().flatten() {
            self.screen_height = height as u32;
        }

        // [tiles] section
        if let Some(size) = config.getfloat("tiles", "tile_size").ok().flatten() {
            self.tile_size = size as f32;
        }
        if let Some(scale) = config.getfloat("tiles", "scale").ok().flatten() {
            self.scale = scale as f32;
        }
        if let Some(depth) = config.getfloat("tiles", "depth_scale").ok().flatten() {
            self.depth_scale = depth as f32;
        }

        // [world] section
        if let Some(max_i) = config.getuint("world", "max_i").ok().flatten() {
            self.max_i = max_i as u32;
        }
        if let Some(max_j) = config.getuint("world", "max_j").ok().flatten() {
            self.max_j = max_j as u32;
        }
        if let Some(max_k) = config.getuint("world", "max_k").ok().flatten() {
            self.max_k = max_k as u32;
        }

        // [time] section
        if let Some(scale) = config.getfloat("time", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [screen] section
        config.set("screen", "width", Some(self.screen_width.to_string()));
        config.set("screen", "height", Some(self.screen_height.to_string()));

        // [tiles] section
        config.set("tiles", "tile_size", Some(self.tile_size.to_string()));
        config.set("tiles", "scale", Some(self.scale.to_string()));
        config.set("tiles", "depth_scale", Some(self.depth_scale.to_string()));

        // [world] section
        config.set("world", "max_i", Some(self.max_i.to_string()));
        config.set("world", "max_j", Some(self.max_j.to_string()));
        config.set("world", "max_k", Some(self.max_k.to_string()));

        // [time] section
        config.set("time", "time_scale", Some(self.time_scale.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the screen size.
    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Build the tile transform these settings describe.
    pub fn tile_transform(&self) -> Result<TileTransform, TransformError> {
        TileTransform::with_params(
            self.screen_width as f32,
            self.screen_height as f32,
            self.tile_size,
            self.scale,
            self.depth_scale,
        )
    }
}
