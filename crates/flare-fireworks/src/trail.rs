//! Fixed-depth trail history stored as one ring buffer per particle

use glam::Vec3;

/// Trail samples for every particle of one burst.
///
/// Storage is particle-major: particle `p` owns the `segments` slots starting
/// at `p * segments`, three floats per slot. All particles share one head
/// index because they advance together once per frame.
#[derive(Debug, Clone)]
pub struct TrailHistory {
    data: Vec<f32>,
    segments: usize,
    particle_count: usize,
    /// Slot holding the most recent sample
    head: usize,
}

impl TrailHistory {
    /// Every sample starts at the particle's current position.
    /// `segments` is clamped to at least 1.
    pub fn new(positions: &[f32], segments: usize) -> Self {
        let segments = segments.max(1);
        let particle_count = positions.len() / 3;
        let mut data = Vec::with_capacity(positions.len() * segments);
        for p in 0..particle_count {
            let xyz = &positions[p * 3..p * 3 + 3];
            for _ in 0..segments {
                data.extend_from_slice(xyz);
            }
        }
        Self {
            data,
            segments,
            particle_count,
            head: 0,
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Raw storage, `3 * particle_count * segments` floats in ring order
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Drop the oldest sample of every particle. The freed slot becomes the
    /// newest and must be filled with `write` before it is read.
    pub fn advance(&mut self) {
        self.head = (self.head + self.segments - 1) % self.segments;
    }

    /// Overwrite the newest sample of particle `p`
    pub fn write(&mut self, p: usize, position: Vec3) {
        let i = (p * self.segments + self.head) * 3;
        position.write_to_slice(&mut self.data[i..i + 3]);
    }

    /// Shift in one frame of positions for every particle
    pub fn push(&mut self, positions: &[f32]) {
        self.advance();
        for p in 0..self.particle_count {
            self.write(p, Vec3::from_slice(&positions[p * 3..p * 3 + 3]));
        }
    }

    /// The `k`-th most recent sample of particle `p` (`k = 0` is the newest)
    pub fn sample(&self, p: usize, k: usize) -> Vec3 {
        let slot = (self.head + k) % self.segments;
        let i = (p * self.segments + slot) * 3;
        Vec3::from_slice(&self.data[i..i + 3])
    }

    /// Samples linearized most-recent-first, particle-major
    pub fn ordered(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.data.len());
        for p in 0..self.particle_count {
            for k in 0..self.segments {
                out.extend_from_slice(&self.sample(p, k).to_array());
            }
        }
        out
    }
}
