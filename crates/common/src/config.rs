//! # Configuration
//!
//! TOML configuration for window, galaxy, generator, bulb and input.

use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parameters::{GalaxyOptions, GalaxyParameters, JitterScaling, WaveDamping};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "starbulb.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct StarbulbConfig {
    pub window: WindowSettings,
    pub galaxy: GalaxyParameters,
    pub generator: GeneratorSettings,
    pub bulb: BulbSettings,
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Upper bound on the window scale factor
    pub max_pixel_ratio: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Starbulb".to_string(),
            width: 1280,
            height: 720,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Fixed seed for reproducible galaxies; entropy when absent
    pub seed: Option<u64>,
    pub jitter: JitterScaling,
    pub damping: WaveDamping,
}

impl GeneratorSettings {
    pub fn options(&self) -> GalaxyOptions {
        GalaxyOptions {
            jitter: self.jitter,
            damping: self.damping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulbSettings {
    /// Model path relative to the asset folder
    pub model: String,
    pub position: [f32; 3],
    pub scale: f32,
    /// Multiplier from scene light levels to renderer lumens
    pub light_power_scale: f32,
    /// Multiplier from emissive intensity to renderer emissive units
    pub emissive_scale: f32,
}

impl Default for BulbSettings {
    fn default() -> Self {
        Self {
            model: "scene.gltf".to_string(),
            position: [0.0, -3.0, 0.0],
            scale: 50.0,
            light_power_scale: 4_000.0,
            emissive_scale: 1_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Scroll distance per mouse wheel line, in logical pixels
    pub scroll_speed: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { scroll_speed: 100.0 }
    }
}

impl StarbulbConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StarbulbConfig = toml::from_str(content)?;
        config.galaxy.validate()?;
        Ok(config)
    }

    /// Load from TOML file or return default
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: PathBuf::from(path),
            source,
        })
    }
}

/// Example TOML configuration file
pub const EXAMPLE_CONFIG: &str = r##"
# Starbulb configuration
# Save as starbulb.toml next to the binary

[window]
title = "Starbulb"
width = 1280
height = 720
max_pixel_ratio = 2.0

[galaxy]
count = 100000
size = 0.01
radius = 5.0
branches = 3
spin = 1.0
randomness = 0.2
randomness_power = 3.0
inside_color = "#ff6030"
outside_color = "#1b3984"
wave_speed = 1.0
wave_height = 0.2

[generator]
# seed = 42
jitter = "scaled"      # or "unscaled"
damping = "clamped"    # or "signed"

[bulb]
model = "scene.gltf"
position = [0.0, -3.0, 0.0]
scale = 50.0
light_power_scale = 4000.0
emissive_scale = 1000.0

[input]
scroll_speed = 100.0
"##;
