//! Fade curves driven by a burst's age relative to its life

use flare_core::Rgb;

/// Warm colour every particle cools towards as it ages
pub const EMBER_COLOR: Rgb = Rgb::new(1.0, 0.42, 0.12);
/// How fast the blend towards `EMBER_COLOR` saturates
pub const EMBER_BLEND_RATE: f32 = 1.1;

/// Seconds the spawn flash stays visible
pub const FLASH_DURATION: f32 = 0.18;
const FLASH_GROWTH: f32 = 0.5;
const HALO_SCALE: f32 = 3.5;
const HALO_OPACITY: f32 = 0.35;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalized age in [0, 1]
pub fn life_progress(age: f32, life: f32) -> f32 {
    if life <= 0.0 {
        1.0
    } else {
        (age / life).clamp(0.0, 1.0)
    }
}

/// Base colour blended towards the ember colour, then dimmed by the fade
pub fn ember_color(base: Rgb, progress: f32) -> Rgb {
    let fade = 1.0 - progress;
    base.lerp(EMBER_COLOR, (progress * EMBER_BLEND_RATE).min(1.0))
        .scale(fade)
}

/// Brightness of the `k`-th most recent trail sample. The denominator is
/// clamped so single-sample trails stay at full brightness.
pub fn trail_sample_fade(k: usize, segments: usize) -> f32 {
    let denom = segments.saturating_sub(1).max(1) as f32;
    (1.0 - k as f32 / denom).max(0.0)
}

/// Per-burst scalars the renderer needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderParams {
    pub life_progress: f32,
    /// 1 at spawn, 0 at expiry
    pub fade: f32,
    pub point_size: f32,
    pub halo_size: f32,
    pub halo_opacity: f32,
    pub trail_opacity: f32,
    pub trail_size: f32,
    pub flash_size: f32,
    pub flash_opacity: f32,
}

/// Inputs for `RenderParams::compute`
#[derive(Debug, Clone, Copy)]
pub struct FadeInputs {
    pub age: f32,
    pub life: f32,
    pub base_size: f32,
    pub flash_scale: f32,
    pub trail_opacity: f32,
    pub trail_size_scale: f32,
    pub trail_persistent: bool,
}

impl RenderParams {
    pub fn compute(inputs: &FadeInputs) -> Self {
        let progress = life_progress(inputs.age, inputs.life);
        let fade = 1.0 - progress;

        // Long trails fade per sample in the colour buffer instead
        let trail_opacity = if inputs.trail_persistent {
            inputs.trail_opacity
        } else {
            inputs.trail_opacity * fade * fade
        };

        let flash_t = (inputs.age / FLASH_DURATION).clamp(0.0, 1.0);

        Self {
            life_progress: progress,
            fade,
            point_size: inputs.base_size * lerp_f32(0.5, 1.0, fade),
            halo_size: inputs.base_size * HALO_SCALE * lerp_f32(0.6, 1.0, fade),
            halo_opacity: HALO_OPACITY * fade,
            trail_opacity,
            trail_size: inputs.base_size * inputs.trail_size_scale,
            flash_size: inputs.flash_scale * (1.0 + FLASH_GROWTH * flash_t),
            flash_opacity: 1.0 - flash_t,
        }
    }
}
