//! # Wave Animator
//!
//! Rewrites the y component of every particle from its original position:
//!
//! ```text
//! dist = sqrt(x0² + z0²)
//! y    = y0 + sin(dist * 2 + t * wave_speed) * wave_height * damping(1 - dist / radius)
//! ```
//!
//! Always computed from the baseline, never from last frame's buffer, so
//! there is no drift and the same `t` gives the same buffer.

use super::buffer::{OriginalPositions, ParticleBuffer};
use crate::parameters::{GalaxyParameters, WaveDamping};

/// Spatial frequency of the wave along the radius.
pub const WAVE_FREQUENCY: f32 = 2.0;

/// Displace `buffer` for `elapsed_seconds`. Only y slots are written.
pub fn advance(
    buffer: &mut ParticleBuffer,
    original: &OriginalPositions,
    elapsed_seconds: f32,
    params: &GalaxyParameters,
    damping: WaveDamping,
) {
    let phase = elapsed_seconds * params.wave_speed;
    let positions = buffer.positions_mut();
    let baseline = original.as_slice();

    for (live, base) in positions.chunks_exact_mut(3).zip(baseline.chunks_exact(3)) {
        let (x0, y0, z0) = (base[0], base[1], base[2]);
        let dist = (x0 * x0 + z0 * z0).sqrt();
        let amplitude = params.wave_height * damping.factor(dist, params.radius);
        live[1] = y0 + (dist * WAVE_FREQUENCY + phase).sin() * amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::generate;
    use crate::parameters::GalaxyOptions;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (GalaxyParameters, ParticleBuffer, OriginalPositions) {
        let params = GalaxyParameters {
            count: 1_000,
            randomness: 0.5,
            ..Default::default()
        };
        let buffer = generate(&params, &GalaxyOptions::default(), &mut StdRng::seed_from_u64(9)).unwrap();
        let original = OriginalPositions::snapshot(&buffer);
        (params, buffer, original)
    }

    #[test]
    fn test_only_y_changes() {
        let (params, mut buffer, original) = fixture();
        for t in [0.0, 0.5, 13.25, 1000.0] {
            advance(&mut buffer, &original, t, &params, WaveDamping::Clamped);
            for i in 0..buffer.len() {
                let [x, _, z] = buffer.position(i);
                let [x0, _, z0] = original.position(i);
                assert_eq!(x, x0);
                assert_eq!(z, z0);
            }
        }
    }

    #[test]
    fn test_idempotent_for_same_time() {
        let (params, mut buffer, original) = fixture();
        advance(&mut buffer, &original, 2.5, &params, WaveDamping::Clamped);
        let first = buffer.clone();

        advance(&mut buffer, &original, 7.0, &params, WaveDamping::Clamped);
        advance(&mut buffer, &original, 2.5, &params, WaveDamping::Clamped);
        assert_eq!(buffer, first);
    }

    #[test]
    fn test_formula_at_time_zero() {
        let (params, mut buffer, original) = fixture();
        let params = GalaxyParameters { wave_height: 0.7, ..params };
        advance(&mut buffer, &original, 0.0, &params, WaveDamping::Signed);

        for i in 0..buffer.len() {
            let [x0, y0, z0] = original.position(i);
            let dist = (x0 * x0 + z0 * z0).sqrt();
            let expected = y0 + (dist * 2.0).sin() * 0.7 * (1.0 - dist / params.radius);
            let [_, y, _] = buffer.position(i);
            assert!((y - expected).abs() < 1e-5, "particle {i}: {y} vs {expected}");
        }
    }

    #[test]
    fn test_clamped_damping_flattens_outside_rim() {
        let params = GalaxyParameters {
            count: 1,
            radius: 1.0,
            wave_height: 1.0,
            ..Default::default()
        };
        let mut buffer = ParticleBuffer::zeroed(1);
        buffer.write(0, [3.0, 0.25, 0.0], [1.0; 3]);
        let original = OriginalPositions::snapshot(&buffer);

        advance(&mut buffer, &original, 0.3, &params, WaveDamping::Clamped);
        assert_eq!(buffer.position(0)[1], 0.25);

        advance(&mut buffer, &original, 0.3, &params, WaveDamping::Signed);
        let expected = 0.25 + (3.0f32 * 2.0 + 0.3).sin() * (1.0 - 3.0);
        assert!((buffer.position(0)[1] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_restores_baseline() {
        let (params, mut buffer, original) = fixture();
        advance(&mut buffer, &original, 4.0, &params, WaveDamping::Clamped);
        let flat = GalaxyParameters { wave_height: 0.0, ..params };
        advance(&mut buffer, &original, 4.0, &flat, WaveDamping::Clamped);
        assert_eq!(buffer.positions(), original.as_slice());
    }
}
