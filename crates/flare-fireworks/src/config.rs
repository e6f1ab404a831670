//! Spawn configuration (per-burst overrides) and global show settings,
//! parsed from TOML

use crate::sampler::{self, BurstStyle};
use flare_core::{FlareError, Result, Rgb};
use glam::Vec3;
use rand::Rng;
use std::path::Path;

/// Smallest lower bound a float range resolves to
const MIN_POSITIVE: f32 = 1e-3;

pub const DEFAULT_COUNT_RANGE: CountRange = CountRange::new(60, 300);
pub const DEFAULT_RADIUS_RANGE: FloatRange = FloatRange::new(2.5, 20.0);
pub const DEFAULT_LIFE_RANGE: FloatRange = FloatRange::new(1.5, 2.8);
pub const DEFAULT_SIZE_RANGE: FloatRange = FloatRange::new(0.06, 0.14);
pub const DEFAULT_FIZZLE_CHANCE: f32 = 0.25;
pub const DEFAULT_SPARK_PROBABILITY: f32 = 0.18;

/// Trail opacity when the burst leaves a long trail
pub const PERSISTENT_TRAIL_OPACITY: f32 = 0.9;
/// Trail opacity for single-sample trails
pub const SHORT_TRAIL_OPACITY: f32 = 0.55;
pub const PERSISTENT_TRAIL_SIZE_SCALE: f32 = 0.6;
pub const SHORT_TRAIL_SIZE_SCALE: f32 = 0.85;

// Sub-burst ("fizzle") configuration
pub const FIZZLE_COUNT_RANGE: CountRange = CountRange::new(10, 22);
pub const FIZZLE_RADIUS_RANGE: FloatRange = FloatRange::new(0.6, 1.4);
pub const FIZZLE_LIFE_RANGE: FloatRange = FloatRange::new(0.25, 0.55);
pub const FIZZLE_SIZE_RANGE: FloatRange = FloatRange::new(0.03, 0.06);

/// Inclusive float interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Swap inverted bounds and lift both bounds to a small positive floor.
    /// Non-finite bounds fall back to `fallback`.
    pub fn sanitized(self, fallback: FloatRange) -> Self {
        if !self.min.is_finite() || !self.max.is_finite() {
            return fallback;
        }
        let (lo, hi) = if self.min > self.max {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        };
        Self {
            min: lo.max(MIN_POSITIVE),
            max: hi.max(MIN_POSITIVE),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        sampler::range(rng, self.min, self.max)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Inclusive particle count interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Swap inverted bounds; a burst always has at least one particle
    pub fn sanitized(self) -> Self {
        let (lo, hi) = if self.min > self.max {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        };
        Self {
            min: lo.max(1),
            max: hi.max(1),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Optional per-spawn overrides. Anything left `None` takes the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnConfig {
    pub count_range: Option<CountRange>,
    pub radius_range: Option<FloatRange>,
    pub life_range: Option<FloatRange>,
    pub size_range: Option<FloatRange>,
    pub base_color: Option<Rgb>,
    pub enable_fizzle: Option<bool>,
    pub fizzle_chance: Option<f32>,
    pub spark_probability: Option<f32>,
    pub trail_opacity: Option<f32>,
    pub trail_size_scale: Option<f32>,
    /// Evict the oldest burst if this spawn pushes the pool over capacity
    pub apply_cap: Option<bool>,
    /// Force (or forbid) a long trail instead of rolling `long_trail_chance`
    pub trail_persistent: Option<bool>,
    /// Force a style instead of the weighted draw
    pub style: Option<BurstStyle>,
}

/// A `SpawnConfig` with defaults filled in and ranges clamped
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpawn {
    pub count_range: CountRange,
    pub radius_range: FloatRange,
    pub life_range: FloatRange,
    pub size_range: FloatRange,
    pub base_color: Option<Rgb>,
    pub enable_fizzle: bool,
    pub fizzle_chance: f32,
    pub spark_probability: f32,
    pub trail_opacity: Option<f32>,
    pub trail_size_scale: Option<f32>,
    pub apply_cap: bool,
    pub trail_persistent: Option<bool>,
    pub style: Option<BurstStyle>,
}

impl SpawnConfig {
    pub fn resolve(&self) -> ResolvedSpawn {
        ResolvedSpawn {
            count_range: self.count_range.unwrap_or(DEFAULT_COUNT_RANGE).sanitized(),
            radius_range: self
                .radius_range
                .unwrap_or(DEFAULT_RADIUS_RANGE)
                .sanitized(DEFAULT_RADIUS_RANGE),
            life_range: self
                .life_range
                .unwrap_or(DEFAULT_LIFE_RANGE)
                .sanitized(DEFAULT_LIFE_RANGE),
            size_range: self
                .size_range
                .unwrap_or(DEFAULT_SIZE_RANGE)
                .sanitized(DEFAULT_SIZE_RANGE),
            base_color: self.base_color,
            enable_fizzle: self.enable_fizzle.unwrap_or(true),
            fizzle_chance: probability(self.fizzle_chance, DEFAULT_FIZZLE_CHANCE),
            spark_probability: probability(self.spark_probability, DEFAULT_SPARK_PROBABILITY),
            trail_opacity: self.trail_opacity.map(|v| v.clamp(0.0, 1.0)),
            trail_size_scale: self.trail_size_scale.map(|v| v.max(0.0)),
            apply_cap: self.apply_cap.unwrap_or(true),
            trail_persistent: self.trail_persistent,
            style: self.style,
        }
    }

    /// Scaled-down configuration for a sub-burst spawned at a particle's apex.
    /// Sub-bursts never fizzle themselves and never evict other bursts.
    pub fn fizzle(color: Rgb) -> Self {
        Self {
            count_range: Some(FIZZLE_COUNT_RANGE),
            radius_range: Some(FIZZLE_RADIUS_RANGE),
            life_range: Some(FIZZLE_LIFE_RANGE),
            size_range: Some(FIZZLE_SIZE_RANGE),
            base_color: Some(color),
            enable_fizzle: Some(false),
            apply_cap: Some(false),
            ..Default::default()
        }
    }

    /// Parse overrides from a TOML table, e.g. the `[spawn]` table of a show file
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("count_range") {
            config.count_range = toml_count_range(v);
        }
        if let Some(v) = table.get("radius_range") {
            config.radius_range = toml_range(v);
        }
        if let Some(v) = table.get("life_range") {
            config.life_range = toml_range(v);
        }
        if let Some(v) = table.get("size_range") {
            config.size_range = toml_range(v);
        }
        if let Some(v) = table.get("base_color") {
            config.base_color = toml_color(v);
        }
        if let Some(v) = table.get("enable_fizzle") {
            config.enable_fizzle = v.as_bool();
        }
        if let Some(v) = table.get("fizzle_chance") {
            config.fizzle_chance = toml_f32(v);
        }
        if let Some(v) = table.get("spark_probability") {
            config.spark_probability = toml_f32(v);
        }
        if let Some(v) = table.get("trail_opacity") {
            config.trail_opacity = toml_f32(v);
        }
        if let Some(v) = table.get("trail_size_scale") {
            config.trail_size_scale = toml_f32(v);
        }
        if let Some(v) = table.get("apply_cap") {
            config.apply_cap = v.as_bool();
        }
        if let Some(v) = table.get("trail_persistent") {
            config.trail_persistent = v.as_bool();
        }
        if let Some(v) = table.get("style") {
            config.style = v.as_str().and_then(BurstStyle::parse);
        }

        config
    }
}

fn probability(value: Option<f32>, default: f32) -> f32 {
    match value {
        Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
        _ => default,
    }
}

/// Global tunables shared by every burst in a show
#[derive(Debug, Clone, PartialEq)]
pub struct ShowSettings {
    /// Pool capacity enforced by cap-respecting spawns
    pub max_active: usize,
    pub gravity: Vec3,
    /// Per-frame velocity multiplier applied on top of each particle's drag factor
    pub global_drag: f32,
    /// Chance that a burst without an explicit override leaves a long trail
    pub long_trail_chance: f32,
    /// Jitter magnitude for spark particles
    pub spark_jitter: f32,
    /// Jitter magnitude for ordinary particles
    pub jitter: f32,
    /// Trail depth for persistent trails
    pub persistent_trail_segments: usize,
    /// Seed for the show's random source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for ShowSettings {
    fn default() -> Self {
        Self {
            max_active: 120,
            gravity: Vec3::new(0.0, -6.0, 0.0),
            global_drag: 0.985,
            long_trail_chance: 0.25,
            spark_jitter: 1.5,
            jitter: 0.6,
            persistent_trail_segments: 50,
            seed: None,
        }
    }
}

impl ShowSettings {
    /// Parse settings from a TOML table (the `[show]` table of a show file).
    /// Missing keys keep their defaults; call `validate` afterwards.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut settings = Self::default();

        if let Some(v) = table.get("max_active") {
            settings.max_active = v.as_integer().unwrap_or(120).max(0) as usize;
        }
        if let Some(v) = table.get("gravity") {
            settings.gravity = toml_vec3(v, settings.gravity);
        }
        if let Some(v) = table.get("global_drag") {
            settings.global_drag = toml_f32(v).unwrap_or(settings.global_drag);
        }
        if let Some(v) = table.get("long_trail_chance") {
            settings.long_trail_chance = toml_f32(v).unwrap_or(settings.long_trail_chance);
        }
        if let Some(v) = table.get("spark_jitter") {
            settings.spark_jitter = toml_f32(v).unwrap_or(settings.spark_jitter);
        }
        if let Some(v) = table.get("jitter") {
            settings.jitter = toml_f32(v).unwrap_or(settings.jitter);
        }
        if let Some(v) = table.get("persistent_trail_segments") {
            settings.persistent_trail_segments = v.as_integer().unwrap_or(50).max(1) as usize;
        }
        if let Some(v) = table.get("seed") {
            settings.seed = v.as_integer().map(|s| s as u64);
        }

        settings
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_active == 0 {
            return Err(FlareError::invalid_setting(
                "max_active",
                "must be at least 1",
            ));
        }
        if !self.gravity.is_finite() {
            return Err(FlareError::invalid_setting("gravity", "must be finite"));
        }
        if !(self.global_drag > 0.0 && self.global_drag <= 1.0) {
            return Err(FlareError::ValueOutOfRange {
                field: "global_drag".into(),
                min: 0.0,
                max: 1.0,
                value: self.global_drag as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.long_trail_chance) {
            return Err(FlareError::ValueOutOfRange {
                field: "long_trail_chance".into(),
                min: 0.0,
                max: 1.0,
                value: self.long_trail_chance as f64,
            });
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0)
            || !(self.spark_jitter.is_finite() && self.spark_jitter >= 0.0)
        {
            return Err(FlareError::invalid_setting(
                "jitter",
                "must be finite and non-negative",
            ));
        }
        if self.persistent_trail_segments == 0 {
            return Err(FlareError::invalid_setting(
                "persistent_trail_segments",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Render the settings as a `[show]` TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        let mut show = toml::value::Table::new();
        show.insert(
            "max_active".into(),
            toml::Value::Integer(self.max_active as i64),
        );
        show.insert(
            "gravity".into(),
            toml::Value::Array(
                self.gravity
                    .to_array()
                    .iter()
                    .map(|c| toml::Value::Float(*c as f64))
                    .collect(),
            ),
        );
        show.insert(
            "global_drag".into(),
            toml::Value::Float(self.global_drag as f64),
        );
        show.insert(
            "long_trail_chance".into(),
            toml::Value::Float(self.long_trail_chance as f64),
        );
        show.insert(
            "spark_jitter".into(),
            toml::Value::Float(self.spark_jitter as f64),
        );
        show.insert("jitter".into(), toml::Value::Float(self.jitter as f64));
        show.insert(
            "persistent_trail_segments".into(),
            toml::Value::Integer(self.persistent_trail_segments as i64),
        );
        if let Some(seed) = self.seed {
            show.insert("seed".into(), toml::Value::Integer(seed as i64));
        }

        let mut root = toml::value::Table::new();
        root.insert("show".into(), toml::Value::Table(show));
        Ok(toml::to_string_pretty(&root)?)
    }
}

/// A show file: `[show]` settings plus default `[spawn]` overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowFile {
    pub show: ShowSettings,
    pub spawn: SpawnConfig,
}

impl ShowFile {
    pub fn parse(source: &str) -> Result<Self> {
        let root: toml::value::Table = toml::from_str(source)?;

        let show = root
            .get("show")
            .and_then(|v| v.as_table())
            .map(ShowSettings::from_toml)
            .unwrap_or_default();
        let spawn = root
            .get("spawn")
            .and_then(|v| v.as_table())
            .map(SpawnConfig::from_toml)
            .unwrap_or_default();

        show.validate()?;
        Ok(Self { show, spawn })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value) -> Option<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
}

fn toml_pair(v: &toml::Value) -> Option<(f32, f32)> {
    let arr = v.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    Some((toml_f32(&arr[0])?, toml_f32(&arr[1])?))
}

fn toml_range(v: &toml::Value) -> Option<FloatRange> {
    toml_pair(v).map(|(min, max)| FloatRange::new(min, max))
}

fn toml_count_range(v: &toml::Value) -> Option<CountRange> {
    toml_pair(v).map(|(min, max)| CountRange::new(min.max(0.0) as u32, max.max(0.0) as u32))
}

fn toml_vec3(v: &toml::Value, default: Vec3) -> Vec3 {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 3 {
            return Vec3::new(
                toml_f32(&arr[0]).unwrap_or(default.x),
                toml_f32(&arr[1]).unwrap_or(default.y),
                toml_f32(&arr[2]).unwrap_or(default.z),
            );
        }
    }
    default
}

/// Accepts `[r, g, b]` or a `"#rrggbb"` string
fn toml_color(v: &toml::Value) -> Option<Rgb> {
    if let Some(s) = v.as_str() {
        let hex = s.trim_start_matches('#');
        return u32::from_str_radix(hex, 16).ok().map(Rgb::from_hex);
    }
    let arr = v.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    Some(Rgb::new(
        toml_f32(&arr[0])?,
        toml_f32(&arr[1])?,
        toml_f32(&arr[2])?,
    ))
}
