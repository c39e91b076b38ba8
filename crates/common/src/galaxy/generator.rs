//! # Galaxy Generator
//!
//! Places particles on evenly spaced spiral arms.
//!
//! Each particle gets a uniform radius, is assigned to an arm by its index,
//! twisted by `radius * spin`, and nudged by three power-curved jitter
//! terms. Color runs from the inside color at the center to the outside
//! color at the rim.

use std::f32::consts::TAU;

use rand::Rng;

use super::buffer::ParticleBuffer;
use crate::error::GalaxyResult;
use crate::parameters::{GalaxyOptions, GalaxyParameters, JitterScaling};

// ============================================================================
// Sampling
// ============================================================================

/// Random draws for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// Distance from the center before jitter, in `[0, params.radius]`
    pub radius: f32,
    /// Additive offset per axis
    pub jitter: [f32; 3],
}

impl ParticleSample {
    /// Draw a radius and three jitter terms.
    pub fn draw(params: &GalaxyParameters, options: &GalaxyOptions, rng: &mut impl Rng) -> Self {
        let radius = rng.gen::<f32>() * params.radius;

        let scale = match options.jitter {
            JitterScaling::Scaled => params.randomness,
            JitterScaling::Unscaled => 1.0,
        };
        let mut axis = || {
            let magnitude = rng.gen::<f32>().powf(params.randomness_power);
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            magnitude * sign * scale
        };
        let jitter = [axis(), axis(), axis()];

        Self { radius, jitter }
    }

    /// A sample with no jitter, handy for exact placement.
    pub fn at_radius(radius: f32) -> Self {
        Self {
            radius,
            jitter: [0.0; 3],
        }
    }
}

// ============================================================================
// Placement
// ============================================================================

/// Angle of the arm particle `index` belongs to.
///
/// Arms are assigned round-robin by index so every arm gets the same share
/// of particles regardless of draw order.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Position and color of particle `index` for a given sample.
pub fn place_particle(
    index: usize,
    sample: &ParticleSample,
    params: &GalaxyParameters,
) -> ([f32; 3], [f32; 3]) {
    let r = sample.radius;
    let angle = branch_angle(index, params.branches) + r * params.spin;
    let [jx, jy, jz] = sample.jitter;

    let position = [angle.cos() * r + jx, jy, angle.sin() * r + jz];

    let t = (r / params.radius).clamp(0.0, 1.0);
    let mixed = params.inside_color.lerp(&params.outside_color, t);

    (position, [mixed.r, mixed.g, mixed.b])
}

// ============================================================================
// Generation
// ============================================================================

/// Build a fresh particle buffer for `params`.
///
/// Fails with [`GalaxyError::InvalidParameter`](crate::error::GalaxyError)
/// before allocating when the parameters cannot describe a galaxy.
pub fn generate(
    params: &GalaxyParameters,
    options: &GalaxyOptions,
    rng: &mut impl Rng,
) -> GalaxyResult<ParticleBuffer> {
    params.validate()?;

    let count = params.count as usize;
    let mut buffer = ParticleBuffer::zeroed(count);

    for i in 0..count {
        let sample = ParticleSample::draw(params, options, rng);
        let (position, color) = place_particle(i, &sample, params);
        buffer.write(i, position, color);
    }

    tracing::debug!(
        count,
        branches = params.branches,
        radius = params.radius,
        "Generated galaxy"
    );

    Ok(buffer)
}
