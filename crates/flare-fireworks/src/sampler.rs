//! Randomized scalars, directions and colours for bursts
//!
//! Every function takes the random source explicitly so seeded shows are
//! reproducible.

use flare_core::{Hsl, Rgb};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Cumulative weight below which a draw picks `BurstStyle::Burst`
const BURST_WEIGHT: f32 = 0.4;
/// Cumulative weight below which a draw picks `BurstStyle::Ring`
const RING_WEIGHT: f32 = 0.7;

/// Half-height of the Z wobble applied to ring directions
pub const RING_Z_JITTER: f32 = 0.15;
/// Upward bias added to spray directions before renormalizing
const SPRAY_LIFT: f32 = 0.8;

const HUE_TINT: f32 = 0.05;
const LIGHTNESS_TINT: f32 = 0.08;
const SPARK_LIGHTNESS_BOOST: f32 = 0.15;
const MAX_LIGHTNESS: f32 = 0.92;

/// Directional distribution of a burst's particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BurstStyle {
    /// Roughly spherical
    Burst,
    /// Planar circle in XY
    Ring,
    /// Upward cone
    Spray,
}

impl BurstStyle {
    pub const ALL: [BurstStyle; 3] = [BurstStyle::Burst, BurstStyle::Ring, BurstStyle::Spray];

    pub fn name(&self) -> &'static str {
        match self {
            BurstStyle::Burst => "burst",
            BurstStyle::Ring => "ring",
            BurstStyle::Spray => "spray",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "burst" => Some(BurstStyle::Burst),
            "ring" => Some(BurstStyle::Ring),
            "spray" => Some(BurstStyle::Spray),
            _ => None,
        }
    }
}

/// Returns a float in [min, max)
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Returns true with probability `p`
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.random::<f32>() < p
}

/// Weighted style draw: burst 40%, ring 30%, spray 30%
pub fn pick_style<R: Rng + ?Sized>(rng: &mut R) -> BurstStyle {
    let roll = rng.random::<f32>();
    if roll < BURST_WEIGHT {
        BurstStyle::Burst
    } else if roll < RING_WEIGHT {
        BurstStyle::Ring
    } else {
        BurstStyle::Spray
    }
}

/// Direction for one particle of a burst with the given style.
///
/// Ring directions keep their XY part on the unit circle and are not
/// renormalized after the Z wobble.
pub fn style_direction<R: Rng + ?Sized>(rng: &mut R, style: BurstStyle) -> Vec3 {
    match style {
        BurstStyle::Ring => {
            let angle = range(rng, 0.0, TAU);
            let z = range(rng, -RING_Z_JITTER, RING_Z_JITTER);
            Vec3::new(angle.cos(), angle.sin(), z)
        }
        BurstStyle::Spray => {
            let radius = rng.random::<f32>().sqrt();
            let angle = range(rng, 0.0, TAU);
            Vec3::new(radius * angle.cos(), SPRAY_LIFT, radius * angle.sin()).normalize_or(Vec3::Y)
        }
        BurstStyle::Burst => {
            let v = Vec3::new(
                range(rng, -1.0, 1.0),
                range(rng, -1.0, 1.0),
                range(rng, -1.0, 1.0),
            );
            v.normalize_or(Vec3::Y)
        }
    }
}

/// Saturated mid-lightness colour with a uniformly random hue
pub fn random_base_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    let h = rng.random::<f32>();
    let s = range(rng, 0.65, 0.9);
    let l = range(rng, 0.5, 0.65);
    Rgb::from_hsl(Hsl { h, s, l })
}

/// Per-particle variation around a burst's base colour. Sparks are lifted
/// towards white.
pub fn tint<R: Rng + ?Sized>(rng: &mut R, base: Rgb, spark: bool) -> Rgb {
    let mut hsl = base.to_hsl();
    hsl.h += range(rng, -HUE_TINT, HUE_TINT);
    hsl.l += range(rng, -LIGHTNESS_TINT, LIGHTNESS_TINT);
    if spark {
        hsl.l = (hsl.l + SPARK_LIGHTNESS_BOOST).min(MAX_LIGHTNESS);
    }
    Rgb::from_hsl(hsl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn range_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = range(&mut rng, 0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn ring_directions_on_unit_circle() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = style_direction(&mut rng, BurstStyle::Ring);
            let xy = (d.x * d.x + d.y * d.y).sqrt();
            assert!((xy - 1.0).abs() < 1e-4);
            assert!(d.z.abs() <= RING_Z_JITTER);
        }
    }

    #[test]
    fn spray_directions_point_up() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..200 {
            let d = style_direction(&mut rng, BurstStyle::Spray);
            assert!((d.length() - 1.0).abs() < 1e-4);
            // Widest cone edge: atan(1 / 0.8)
            assert!(d.y >= 0.62);
        }
    }

    #[test]
    fn burst_directions_unit_length() {
        let mut rng = StdRng::seed_from_u64(123);
        for _ in 0..200 {
            let d = style_direction(&mut rng, BurstStyle::Burst);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn style_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            match pick_style(&mut rng) {
                BurstStyle::Burst => counts[0] += 1,
                BurstStyle::Ring => counts[1] += 1,
                BurstStyle::Spray => counts[2] += 1,
            }
        }
        let share = |c: usize| c as f32 / n as f32;
        assert!((share(counts[0]) - 0.4).abs() < 0.02);
        assert!((share(counts[1]) - 0.3).abs() < 0.02);
        assert!((share(counts[2]) - 0.3).abs() < 0.02);
    }

    #[test]
    fn base_color_within_hsl_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let hsl = random_base_color(&mut rng).to_hsl();
            assert!(hsl.s >= 0.64 && hsl.s <= 0.91, "saturation {}", hsl.s);
            assert!(hsl.l >= 0.49 && hsl.l <= 0.66, "lightness {}", hsl.l);
        }
    }

    #[test]
    fn spark_tint_is_brighter() {
        let mut rng = StdRng::seed_from_u64(11);
        let base = Rgb::from_hsl(Hsl {
            h: 0.3,
            s: 0.8,
            l: 0.5,
        });
        for _ in 0..50 {
            let spark = tint(&mut rng, base, true).to_hsl();
            assert!(spark.l >= 0.5 + SPARK_LIGHTNESS_BOOST - LIGHTNESS_TINT - 1e-3);
        }
    }

    #[test]
    fn style_names_parse_back() {
        for style in BurstStyle::ALL {
            assert_eq!(BurstStyle::parse(style.name()), Some(style));
        }
        assert_eq!(BurstStyle::parse("comet"), None);
    }
}
