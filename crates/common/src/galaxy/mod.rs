//! # Galaxy
//!
//! Procedural spiral galaxy and its per-frame wave animation.
//!
//! ## Table of Contents
//!
//! 1. **Buffer** - ParticleBuffer, OriginalPositions, Galaxy
//! 2. **Generator** - spiral/branch placement with jitter
//! 3. **Animator** - radial sine wave over the original positions

pub mod animator;
pub mod buffer;
pub mod generator;

pub use animator::advance;
pub use buffer::{Galaxy, OriginalPositions, ParticleBuffer};
pub use generator::{branch_angle, generate, place_particle, ParticleSample};
