//! Flat particle storage shared by the generator, the animator and the
//! renderer upload.

use std::sync::Arc;

/// Parallel position and color arrays, three floats per particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl ParticleBuffer {
    /// Zero-filled buffer for `count` particles.
    pub fn zeroed(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [f32] {
        &mut self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Position of particle `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.positions[i3], self.positions[i3 + 1], self.positions[i3 + 2]]
    }

    /// Color of particle `i`.
    pub fn color(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.colors[i3], self.colors[i3 + 1], self.colors[i3 + 2]]
    }

    pub(crate) fn write(&mut self, i: usize, position: [f32; 3], color: [f32; 3]) {
        let i3 = i * 3;
        self.positions[i3..i3 + 3].copy_from_slice(&position);
        self.colors[i3..i3 + 3].copy_from_slice(&color);
    }
}

/// Read-only snapshot of the positions as generated.
///
/// Cloning shares the storage; there is no way to mutate it after
/// [`OriginalPositions::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalPositions(Arc<[f32]>);

impl OriginalPositions {
    pub fn snapshot(buffer: &ParticleBuffer) -> Self {
        Self(Arc::from(buffer.positions()))
    }

    pub fn len(&self) -> usize {
        self.0.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.0[i3], self.0[i3 + 1], self.0[i3 + 2]]
    }
}

/// One generated galaxy: live buffer, its baseline, and a generation tag.
///
/// The three are always replaced together.
#[derive(Debug, Clone)]
pub struct Galaxy {
    pub buffer: ParticleBuffer,
    pub original: OriginalPositions,
    pub generation: u64,
}

impl Galaxy {
    pub fn new(buffer: ParticleBuffer, generation: u64) -> Self {
        let original = OriginalPositions::snapshot(&buffer);
        Self {
            buffer,
            original,
            generation,
        }
    }
}
