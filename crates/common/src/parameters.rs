//! # Galaxy Parameters
//!
//! The tunable record the generator and animator read from.
//!
//! ## Table of Contents
//!
//! 1. **Rgb** - sRGB color triple with `#rrggbb` serialization
//! 2. **GalaxyParameters** - the parameter record and its validation
//! 3. **GalaxyOptions** - behavioral switches for jitter and damping

use bevy::color::{Hsla, Hue, Srgba};
use serde::{Deserialize, Serialize};

use crate::error::{GalaxyError, GalaxyResult};

// ============================================================================
// 1. Rgb
// ============================================================================

/// sRGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> GalaxyResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GalaxyError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| GalaxyError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Mix towards `other` by `t`.
    ///
    /// `t = 0` returns `self` and `t = 1` returns `other` bit for bit.
    pub fn lerp(&self, other: &Rgb, t: f32) -> Rgb {
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Rotate the hue by `degrees`, keeping saturation and lightness.
    pub fn rotate_hue(&self, degrees: f32) -> Rgb {
        let rotated = Hsla::from(self.to_srgba()).rotate_hue(degrees);
        let srgba = Srgba::from(rotated);
        Rgb::new(srgba.red, srgba.green, srgba.blue)
    }

    pub fn to_srgba(&self) -> Srgba {
        Srgba::new(self.r, self.g, self.b, 1.0)
    }
}

impl TryFrom<String> for Rgb {
    type Error = GalaxyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

// ============================================================================
// 2. GalaxyParameters
// ============================================================================

/// Parameter set for one galaxy.
///
/// Fields are independent; only per-field ranges are enforced, and only
/// by [`GalaxyParameters::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParameters {
    /// Number of particles
    pub count: u32,
    /// Edge length of each particle sprite in world units
    pub size: f32,
    /// Outer radius of the disc
    pub radius: f32,
    /// Number of spiral arms
    pub branches: u32,
    /// Twist applied per unit of radius
    pub spin: f32,
    /// Jitter magnitude
    pub randomness: f32,
    /// Exponent concentrating jitter near zero
    pub randomness_power: f32,
    /// Color at the center
    pub inside_color: Rgb,
    /// Color at the rim
    pub outside_color: Rgb,
    /// Wave phase velocity (radians per second)
    pub wave_speed: f32,
    /// Wave amplitude at the center
    pub wave_height: f32,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Rgb::new(1.0, 96.0 / 255.0, 48.0 / 255.0),
            outside_color: Rgb::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0),
            wave_speed: 1.0,
            wave_height: 0.2,
        }
    }
}

impl GalaxyParameters {
    /// Reject inputs the generator cannot place particles with.
    pub fn validate(&self) -> GalaxyResult<()> {
        if self.count < 1 {
            return Err(GalaxyError::invalid("count", self.count, "must be at least 1"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GalaxyError::invalid("radius", self.radius, "must be finite and positive"));
        }
        if self.branches < 1 {
            return Err(GalaxyError::invalid("branches", self.branches, "must be at least 1"));
        }
        if !self.randomness.is_finite() || self.randomness < 0.0 {
            return Err(GalaxyError::invalid("randomness", self.randomness, "must be finite and non-negative"));
        }
        if !self.randomness_power.is_finite() || self.randomness_power < 1.0 {
            return Err(GalaxyError::invalid("randomness_power", self.randomness_power, "must be finite and at least 1"));
        }
        if !self.spin.is_finite() {
            return Err(GalaxyError::invalid("spin", self.spin, "must be finite"));
        }
        Ok(())
    }

    /// True when the fields the generator reads differ from `other`.
    ///
    /// Wave fields are read live every frame and never need a rebuild.
    pub fn needs_regeneration(&self, other: &GalaxyParameters) -> bool {
        self.count != other.count
            || self.size != other.size
            || self.radius != other.radius
            || self.branches != other.branches
            || self.spin != other.spin
            || self.randomness != other.randomness
            || self.randomness_power != other.randomness_power
            || self.inside_color != other.inside_color
            || self.outside_color != other.outside_color
    }
}

// ============================================================================
// 3. GalaxyOptions
// ============================================================================

/// Whether the `randomness` parameter scales the jitter terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterScaling {
    /// Jitter is multiplied by `randomness`.
    #[default]
    Scaled,
    /// Jitter ignores `randomness` (legacy behavior).
    Unscaled,
}

/// How the wave damping factor `1 - dist / radius` is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveDamping {
    /// Clamp to `[0, 1]`; particles pushed past the rim stay flat.
    #[default]
    Clamped,
    /// Use the raw factor, which goes negative past the rim.
    Signed,
}

impl WaveDamping {
    pub fn factor(&self, dist: f32, radius: f32) -> f32 {
        let raw = 1.0 - dist / radius;
        match self {
            WaveDamping::Clamped => raw.clamp(0.0, 1.0),
            WaveDamping::Signed => raw,
        }
    }
}

/// Behavioral switches for the generator and animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyOptions {
    pub jitter: JitterScaling,
    pub damping: WaveDamping,
}
