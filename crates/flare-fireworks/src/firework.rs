//! One burst: flat per-particle buffers plus burst-level state

use crate::curves::{self, FadeInputs, RenderParams};
use crate::sampler::BurstStyle;
use crate::trail::TrailHistory;
use flare_core::{FireworkId, Rgb};
use glam::Vec3;

/// A single firework burst.
///
/// Per-particle vectors are stored interleaved (`x, y, z` or `r, g, b`) so
/// a renderer can upload them without repacking.
#[derive(Debug, Clone)]
pub struct Firework {
    pub id: FireworkId,
    pub style: BurstStyle,
    pub particle_count: usize,
    pub positions: Vec<f32>,
    pub velocities: Vec<f32>,
    /// Colour each particle was born with
    pub base_colors: Vec<f32>,
    /// Colour after this frame's ember fade
    pub colors: Vec<f32>,
    pub drag_factor: Vec<f32>,
    pub is_spark: Vec<bool>,
    pub fizzle_eligible: Vec<bool>,
    pub fizzle_triggered: Vec<bool>,
    pub trail: TrailHistory,
    pub trail_persistent: bool,
    pub age: f32,
    pub life: f32,
    pub base_size: f32,
    pub flash_scale: f32,
    pub trail_opacity: f32,
    pub trail_size_scale: f32,
    pub base_color: Rgb,
    /// Burst-level switch; sub-bursts clear it so fizzles never recurse
    pub enable_fizzle: bool,
    pub render: RenderParams,
}

impl Firework {
    pub fn position(&self, p: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[p * 3..p * 3 + 3])
    }

    pub fn set_position(&mut self, p: usize, position: Vec3) {
        position.write_to_slice(&mut self.positions[p * 3..p * 3 + 3]);
    }

    pub fn velocity(&self, p: usize) -> Vec3 {
        Vec3::from_slice(&self.velocities[p * 3..p * 3 + 3])
    }

    pub fn set_velocity(&mut self, p: usize, velocity: Vec3) {
        velocity.write_to_slice(&mut self.velocities[p * 3..p * 3 + 3]);
    }

    pub fn color(&self, p: usize) -> Rgb {
        rgb_at(&self.colors, p)
    }

    pub fn particle_base_color(&self, p: usize) -> Rgb {
        rgb_at(&self.base_colors, p)
    }

    pub fn set_color(&mut self, p: usize, color: Rgb) {
        self.colors[p * 3..p * 3 + 3].copy_from_slice(&color.to_array());
    }

    pub fn trail_segments(&self) -> usize {
        self.trail.segments()
    }

    pub fn life_progress(&self) -> f32 {
        curves::life_progress(self.age, self.life)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.life
    }

    pub fn fizzles_triggered(&self) -> usize {
        self.fizzle_triggered.iter().filter(|t| **t).count()
    }

    pub(crate) fn fade_inputs(&self) -> FadeInputs {
        FadeInputs {
            age: self.age,
            life: self.life,
            base_size: self.base_size,
            flash_scale: self.flash_scale,
            trail_opacity: self.trail_opacity,
            trail_size_scale: self.trail_size_scale,
            trail_persistent: self.trail_persistent,
        }
    }

    /// Recompute the derived render scalars from the current age
    pub fn refresh_render_params(&mut self) {
        self.render = RenderParams::compute(&self.fade_inputs());
    }

    /// Trail colours, most-recent-first per particle, each sample dimmed by
    /// its distance from the head of the trail
    pub fn trail_colors(&self) -> Vec<f32> {
        let segments = self.trail_segments();
        let mut out = Vec::with_capacity(self.particle_count * segments * 3);
        for p in 0..self.particle_count {
            let color = self.color(p);
            for k in 0..segments {
                let faded = color.scale(curves::trail_sample_fade(k, segments));
                out.extend_from_slice(&faded.to_array());
            }
        }
        out
    }

    /// Whether every buffer has the length its particle count demands
    pub fn buffers_consistent(&self) -> bool {
        let n = self.particle_count;
        self.positions.len() == 3 * n
            && self.velocities.len() == 3 * n
            && self.base_colors.len() == 3 * n
            && self.colors.len() == 3 * n
            && self.drag_factor.len() == n
            && self.is_spark.len() == n
            && self.fizzle_eligible.len() == n
            && self.fizzle_triggered.len() == n
            && self.trail.particle_count() == n
            && self.trail.as_flat().len() == 3 * n * self.trail_segments()
            && (self.trail_persistent || self.trail_segments() == 1)
    }
}

fn rgb_at(buffer: &[f32], p: usize) -> Rgb {
    Rgb::new(buffer[p * 3], buffer[p * 3 + 1], buffer[p * 3 + 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountRange, ShowSettings, SpawnConfig};
    use crate::spawner::spawn_firework;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn burst(persistent: bool) -> Firework {
        let mut rng = StdRng::seed_from_u64(7);
        let config = SpawnConfig {
            count_range: Some(CountRange::new(2, 2)),
            trail_persistent: Some(persistent),
            enable_fizzle: Some(false),
            ..Default::default()
        };
        spawn_firework(
            &mut rng,
            FireworkId(1),
            Vec3::ZERO,
            &config,
            &ShowSettings::default(),
        )
    }

    #[test]
    fn long_trail_colors_dim_from_head_to_tail() {
        let mut fw = burst(true);
        fw.set_color(1, Rgb::new(0.8, 0.4, 0.2));
        let segments = fw.trail_segments();
        assert_eq!(segments, 50);

        let colors = fw.trail_colors();
        assert_eq!(colors.len(), 2 * segments * 3);

        let head = (segments) * 3;
        assert_eq!(&colors[head..head + 3], &[0.8, 0.4, 0.2]);
        let tail = (2 * segments - 1) * 3;
        assert_eq!(&colors[tail..tail + 3], &[0.0, 0.0, 0.0]);

        let mid = (segments + 10) * 3;
        assert!(colors[mid] < 0.8 && colors[mid] > 0.0);
    }

    #[test]
    fn short_trail_colors_keep_full_brightness() {
        let mut fw = burst(false);
        fw.set_color(0, Rgb::new(0.5, 0.25, 1.0));
        assert_eq!(fw.trail_segments(), 1);

        let colors = fw.trail_colors();
        assert_eq!(colors.len(), 2 * 3);
        assert_eq!(&colors[..3], &[0.5, 0.25, 1.0]);
    }

    #[test]
    fn spawned_buffers_are_consistent() {
        assert!(burst(true).buffers_consistent());
        assert!(burst(false).buffers_consistent());
    }
}
