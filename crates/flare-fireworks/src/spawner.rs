//! Builds a burst from a world position and a spawn configuration

use crate::config::{
    ShowSettings, SpawnConfig, PERSISTENT_TRAIL_OPACITY, PERSISTENT_TRAIL_SIZE_SCALE,
    SHORT_TRAIL_OPACITY, SHORT_TRAIL_SIZE_SCALE,
};
use crate::curves::RenderParams;
use crate::firework::Firework;
use crate::sampler;
use crate::trail::TrailHistory;
use flare_core::FireworkId;
use glam::Vec3;
use rand::Rng;

const SPARK_SPEED: (f32, f32) = (1.35, 1.9);
const PARTICLE_SPEED: (f32, f32) = (0.6, 1.2);
const DRAG_FACTOR: (f32, f32) = (0.97, 0.995);
/// Flash sprite size relative to the burst radius
const FLASH_RADIUS_SCALE: (f32, f32) = (0.12, 0.18);

/// Create a burst at `origin`. Burst-level parameters are drawn once up
/// front, then each particle gets its direction, speed, tint and drag.
pub fn spawn_firework<R: Rng + ?Sized>(
    rng: &mut R,
    id: FireworkId,
    origin: Vec3,
    config: &SpawnConfig,
    settings: &ShowSettings,
) -> Firework {
    let resolved = config.resolve();

    let style = resolved.style.unwrap_or_else(|| sampler::pick_style(rng));
    let radius = resolved.radius_range.sample(rng);
    let life = resolved.life_range.sample(rng);
    let base_size = resolved.size_range.sample(rng);
    let will_fizzle = resolved.enable_fizzle && sampler::chance(rng, resolved.fizzle_chance);
    let trail_persistent = resolved
        .trail_persistent
        .unwrap_or_else(|| sampler::chance(rng, settings.long_trail_chance));
    let base_color = resolved
        .base_color
        .unwrap_or_else(|| sampler::random_base_color(rng));
    let particle_count = resolved.count_range.sample(rng) as usize;
    let flash_scale = radius * sampler::range(rng, FLASH_RADIUS_SCALE.0, FLASH_RADIUS_SCALE.1);

    let (default_opacity, default_size_scale, segments) = if trail_persistent {
        (
            PERSISTENT_TRAIL_OPACITY,
            PERSISTENT_TRAIL_SIZE_SCALE,
            settings.persistent_trail_segments.max(1),
        )
    } else {
        (SHORT_TRAIL_OPACITY, SHORT_TRAIL_SIZE_SCALE, 1)
    };

    let mut positions = Vec::with_capacity(particle_count * 3);
    let mut velocities = Vec::with_capacity(particle_count * 3);
    let mut base_colors = Vec::with_capacity(particle_count * 3);
    let mut drag_factor = Vec::with_capacity(particle_count);
    let mut is_spark = Vec::with_capacity(particle_count);

    for _ in 0..particle_count {
        let direction = sampler::style_direction(rng, style);
        let spark = sampler::chance(rng, resolved.spark_probability);
        let (lo, hi) = if spark { SPARK_SPEED } else { PARTICLE_SPEED };
        let speed = radius * sampler::range(rng, lo, hi);
        let color = sampler::tint(rng, base_color, spark);

        positions.extend_from_slice(&origin.to_array());
        velocities.extend_from_slice(&(direction * speed).to_array());
        base_colors.extend_from_slice(&color.to_array());
        drag_factor.push(sampler::range(rng, DRAG_FACTOR.0, DRAG_FACTOR.1));
        is_spark.push(spark);
    }

    let trail = TrailHistory::new(&positions, segments);

    let mut firework = Firework {
        id,
        style,
        particle_count,
        colors: base_colors.clone(),
        positions,
        velocities,
        base_colors,
        drag_factor,
        is_spark,
        fizzle_eligible: vec![will_fizzle; particle_count],
        fizzle_triggered: vec![false; particle_count],
        trail,
        trail_persistent,
        age: 0.0,
        life,
        base_size,
        flash_scale,
        trail_opacity: resolved.trail_opacity.unwrap_or(default_opacity),
        trail_size_scale: resolved.trail_size_scale.unwrap_or(default_size_scale),
        base_color,
        enable_fizzle: resolved.enable_fizzle,
        render: RenderParams::default(),
    };
    firework.refresh_render_params();
    firework
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountRange, FloatRange, DEFAULT_COUNT_RANGE};
    use flare_core::Rgb;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn(seed: u64, config: &SpawnConfig) -> Firework {
        let mut rng = StdRng::seed_from_u64(seed);
        spawn_firework(
            &mut rng,
            FireworkId(1),
            Vec3::new(1.0, 2.0, 3.0),
            config,
            &ShowSettings::default(),
        )
    }

    #[test]
    fn default_spawn_is_consistent() {
        for seed in 0..20 {
            let fw = spawn(seed, &SpawnConfig::default());
            assert!(fw.buffers_consistent());
            assert!(DEFAULT_COUNT_RANGE.contains(fw.particle_count as u32));
            assert_eq!(fw.age, 0.0);
            assert!(fw.life >= 1.5 && fw.life <= 2.8);
            for p in 0..fw.particle_count {
                assert_eq!(fw.position(p), Vec3::new(1.0, 2.0, 3.0));
                assert_eq!(fw.trail.sample(p, 0), fw.position(p));
                assert!(fw.drag_factor[p] >= 0.97 && fw.drag_factor[p] <= 0.995);
            }
        }
    }

    #[test]
    fn fizzle_eligibility_is_shared_by_the_whole_burst() {
        for seed in 0..40 {
            let fw = spawn(seed, &SpawnConfig::default());
            let first = fw.fizzle_eligible[0];
            assert!(fw.fizzle_eligible.iter().all(|e| *e == first));
            assert!(fw.fizzle_triggered.iter().all(|t| !*t));
        }
    }

    #[test]
    fn trail_depth_follows_persistence() {
        let long = spawn(
            3,
            &SpawnConfig {
                trail_persistent: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(long.trail_segments(), 50);
        assert!((long.trail_opacity - PERSISTENT_TRAIL_OPACITY).abs() < 1e-6);

        let short = spawn(
            3,
            &SpawnConfig {
                trail_persistent: Some(false),
                trail_opacity: Some(0.3),
                ..Default::default()
            },
        );
        assert_eq!(short.trail_segments(), 1);
        assert!((short.trail_opacity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn spark_speeds_exceed_ordinary_speeds() {
        let config = SpawnConfig {
            radius_range: Some(FloatRange::new(10.0, 10.0)),
            spark_probability: Some(0.5),
            count_range: Some(CountRange::new(200, 200)),
            ..Default::default()
        };
        let fw = spawn(9, &config);
        for p in 0..fw.particle_count {
            // Ring directions carry a small Z component, so allow a little slack
            let speed = fw.velocity(p).length();
            if fw.is_spark[p] {
                assert!(speed >= 13.5 - 1e-3 && speed <= 19.0 * 1.012);
            } else {
                assert!(speed >= 6.0 - 1e-3 && speed <= 12.0 * 1.012);
            }
        }
    }

    #[test]
    fn disabled_fizzle_never_marks_particles() {
        let config = SpawnConfig {
            enable_fizzle: Some(false),
            fizzle_chance: Some(1.0),
            ..Default::default()
        };
        let fw = spawn(1, &config);
        assert!(!fw.enable_fizzle);
        assert!(fw.fizzle_eligible.iter().all(|e| !*e));
    }

    #[test]
    fn base_color_override_is_kept() {
        let color = Rgb::new(0.9, 0.1, 0.1);
        let fw = spawn(
            2,
            &SpawnConfig {
                base_color: Some(color),
                ..Default::default()
            },
        );
        assert_eq!(fw.base_color, color);
        assert_eq!(fw.colors, fw.base_colors);
    }

    proptest! {
        #[test]
        fn particle_count_within_range(seed in any::<u64>(), lo in 1u32..50, span in 0u32..50) {
            let range = CountRange::new(lo, lo + span);
            let fw = spawn(seed, &SpawnConfig { count_range: Some(range), ..Default::default() });
            prop_assert!(range.contains(fw.particle_count as u32));
            prop_assert!(fw.buffers_consistent());
        }
    }
}
