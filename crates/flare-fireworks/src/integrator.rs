//! Per-frame physics for one burst

use crate::config::ShowSettings;
use crate::curves;
use crate::firework::Firework;
use crate::sampler;
use flare_core::Rgb;
use glam::Vec3;
use rand::Rng;

/// A sub-burst requested while integrating. Requests are collected during
/// the pass and spawned after it, so a sub-burst never ages in the frame
/// that created it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FizzleRequest {
    pub position: Vec3,
    pub color: Rgb,
}

/// Advance one burst by `delta` seconds.
///
/// Per particle, in order: trail shift, drag, jitter, gravity, Euler
/// position update (the new position becomes the newest trail sample),
/// apex fizzle check, ember fade.
pub fn step_firework<R: Rng + ?Sized>(
    rng: &mut R,
    firework: &mut Firework,
    settings: &ShowSettings,
    delta: f32,
    fizzles: &mut Vec<FizzleRequest>,
) {
    firework.age += delta;

    let progress = firework.life_progress();
    let gravity_step = settings.gravity * delta;

    firework.trail.advance();

    for p in 0..firework.particle_count {
        let mut velocity = firework.velocity(p);
        let rising = velocity.y > 0.0;

        velocity *= settings.global_drag * firework.drag_factor[p];

        let jitter = if firework.is_spark[p] {
            settings.spark_jitter
        } else {
            settings.jitter
        };
        if jitter > 0.0 {
            let noise = Vec3::new(
                sampler::range(rng, -0.5, 0.5),
                sampler::range(rng, -0.5, 0.5),
                sampler::range(rng, -0.5, 0.5),
            );
            velocity += noise * (jitter * delta);
        }

        velocity += gravity_step;

        let position = firework.position(p) + velocity * delta;
        firework.set_velocity(p, velocity);
        firework.set_position(p, position);
        firework.trail.write(p, position);

        // Apex: vertical velocity crossed from positive to non-positive
        if firework.enable_fizzle
            && firework.fizzle_eligible[p]
            && !firework.fizzle_triggered[p]
            && rising
            && velocity.y <= 0.0
        {
            fizzles.push(FizzleRequest {
                position,
                color: firework.color(p),
            });
            firework.fizzle_triggered[p] = true;
        }

        let faded = curves::ember_color(firework.particle_base_color(p), progress);
        firework.set_color(p, faded);
    }

    firework.refresh_render_params();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CountRange, SpawnConfig};
    use crate::spawner::spawn_firework;
    use flare_core::FireworkId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_settings() -> ShowSettings {
        ShowSettings {
            jitter: 0.0,
            spark_jitter: 0.0,
            ..Default::default()
        }
    }

    fn single_particle(enable_fizzle: bool) -> Firework {
        let mut rng = StdRng::seed_from_u64(17);
        let config = SpawnConfig {
            count_range: Some(CountRange::new(1, 1)),
            enable_fizzle: Some(enable_fizzle),
            fizzle_chance: Some(1.0),
            trail_persistent: Some(true),
            ..Default::default()
        };
        spawn_firework(
            &mut rng,
            FireworkId(1),
            Vec3::ZERO,
            &config,
            &quiet_settings(),
        )
    }

    #[test]
    fn euler_step_matches_formula() {
        let settings = quiet_settings();
        let mut fw = single_particle(false);
        fw.set_velocity(0, Vec3::new(2.0, 3.0, -1.0));
        let drag = settings.global_drag * fw.drag_factor[0];
        let dt = 0.05;

        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();
        step_firework(&mut rng, &mut fw, &settings, dt, &mut fizzles);

        let expected_v = Vec3::new(2.0, 3.0, -1.0) * drag + settings.gravity * dt;
        assert!((fw.velocity(0) - expected_v).length() < 1e-5);
        assert!((fw.position(0) - expected_v * dt).length() < 1e-5);
        assert!((fw.age - dt).abs() < 1e-6);
    }

    #[test]
    fn trail_keeps_history_newest_first() {
        let settings = quiet_settings();
        let mut fw = single_particle(false);
        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();

        let mut visited = vec![fw.position(0)];
        for _ in 0..3 {
            step_firework(&mut rng, &mut fw, &settings, 0.016, &mut fizzles);
            visited.push(fw.position(0));
        }
        for (k, expected) in visited.iter().rev().enumerate() {
            assert_eq!(fw.trail.sample(0, k), *expected);
        }
        // Untouched slots still hold the spawn position
        assert_eq!(fw.trail.sample(0, 10), Vec3::ZERO);
    }

    #[test]
    fn apex_spawns_one_request_and_latches() {
        let settings = quiet_settings();
        let mut fw = single_particle(true);
        fw.set_velocity(0, Vec3::new(0.0, 0.1, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();

        step_firework(&mut rng, &mut fw, &settings, 1.0 / 30.0, &mut fizzles);
        assert!(fw.velocity(0).y < 0.0);
        assert_eq!(fizzles.len(), 1);
        assert_eq!(fizzles[0].position, fw.position(0));
        assert!(fw.fizzle_triggered[0]);

        fw.set_velocity(0, Vec3::new(0.0, 0.1, 0.0));
        step_firework(&mut rng, &mut fw, &settings, 1.0 / 30.0, &mut fizzles);
        assert_eq!(fizzles.len(), 1);
    }

    #[test]
    fn no_fizzle_when_burst_disabled() {
        let settings = quiet_settings();
        let mut fw = single_particle(false);
        fw.fizzle_eligible[0] = true;
        fw.set_velocity(0, Vec3::new(0.0, 0.1, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();

        step_firework(&mut rng, &mut fw, &settings, 1.0 / 30.0, &mut fizzles);
        assert!(fizzles.is_empty());
        assert!(!fw.fizzle_triggered[0]);
    }

    #[test]
    fn falling_particle_does_not_fizzle() {
        let settings = quiet_settings();
        let mut fw = single_particle(true);
        fw.set_velocity(0, Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();

        step_firework(&mut rng, &mut fw, &settings, 1.0 / 30.0, &mut fizzles);
        assert!(fizzles.is_empty());
    }

    #[test]
    fn colors_cool_and_fade_with_age() {
        let settings = quiet_settings();
        let mut fw = single_particle(false);
        let base = fw.particle_base_color(0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut fizzles = Vec::new();

        let half = fw.life * 0.5;
        step_firework(&mut rng, &mut fw, &settings, half, &mut fizzles);
        let expected = curves::ember_color(base, 0.5);
        let got = fw.color(0);
        assert!((got.r - expected.r).abs() < 1e-4);
        assert!((got.g - expected.g).abs() < 1e-4);
        assert!((got.b - expected.b).abs() < 1e-4);
        assert!((fw.render.fade - 0.5).abs() < 1e-4);
    }

    #[test]
    fn jitter_perturbs_velocity() {
        let settings = ShowSettings::default();
        let mut quiet = single_particle(false);
        let mut noisy = quiet.clone();
        let mut rng = StdRng::seed_from_u64(4);
        let mut fizzles = Vec::new();

        step_firework(&mut rng, &mut quiet, &quiet_settings(), 0.1, &mut fizzles);
        step_firework(&mut rng, &mut noisy, &settings, 0.1, &mut fizzles);

        let diff = (quiet.velocity(0) - noisy.velocity(0)).abs();
        // Noise is bounded by half the magnitude per axis
        assert!(diff.max_element() <= 0.5 * settings.spark_jitter * 0.1 + 1e-5);
        assert!(diff.max_element() > 0.0);
    }
}
