//! The simulation context: owns the pool, the random source and the
//! renderer hooks, and drives spawning and integration

use crate::config::{ShowSettings, SpawnConfig};
use crate::curves::RenderParams;
use crate::firework::Firework;
use crate::integrator::{step_firework, FizzleRequest};
use crate::pool::FireworkPool;
use crate::render::{FireworkDrawData, NullSink, ParticleInstance, RenderSink};
use crate::spawner::spawn_firework;
use flare_core::{FireworkId, IdAllocator, Result};
use flare_runtime::FrameSystem;
use glam::Vec3;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Running totals over the lifetime of a show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShowStats {
    pub frames: u64,
    pub spawned: u64,
    pub fizzles: u64,
    pub evicted: u64,
    pub expired: u64,
    pub peak_active: usize,
    pub peak_particles: usize,
}

/// What happened during one `advance` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Bursts integrated this frame
    pub advanced: usize,
    pub expired: usize,
    pub fizzles: usize,
}

/// A running fireworks display.
///
/// Create one per display, call `spawn` on input and `advance` once per
/// frame. Dropping the show releases every remaining burst through the sink.
pub struct FireworkShow<S: RenderSink = NullSink> {
    settings: ShowSettings,
    rng: StdRng,
    pool: FireworkPool,
    sink: S,
    ids: IdAllocator,
    stats: ShowStats,
    /// Pre-allocated instance buffer for packing particles
    instance_buffer: Vec<ParticleInstance>,
    /// Trail samples, most-recent-first, for every packed burst
    trail_buffer: Vec<f32>,
    /// Per-sample faded trail colours, parallel to `trail_buffer`
    trail_color_buffer: Vec<f32>,
    /// Per-burst ranges into the packed buffers
    instance_ranges: Vec<PackedRange>,
}

/// Everything the renderer needs for one burst, copied at pack time so
/// later pool changes cannot pair buffers with the wrong burst
#[derive(Debug, Clone, Copy)]
struct PackedRange {
    id: FireworkId,
    start: usize,
    count: usize,
    trail_start: usize,
    trail_len: usize,
    params: RenderParams,
    trail_persistent: bool,
    trail_segments: usize,
}

impl FireworkShow<NullSink> {
    pub fn new(settings: ShowSettings) -> Result<Self> {
        Self::with_sink(settings, NullSink)
    }
}

impl Default for FireworkShow<NullSink> {
    fn default() -> Self {
        Self::build(ShowSettings::default(), NullSink)
    }
}

impl<S: RenderSink> FireworkShow<S> {
    pub fn with_sink(settings: ShowSettings, sink: S) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(settings, sink))
    }

    fn build(settings: ShowSettings, sink: S) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            pool: FireworkPool::new(settings.max_active),
            settings,
            rng,
            sink,
            ids: IdAllocator::new(),
            stats: ShowStats::default(),
            instance_buffer: Vec::new(),
            trail_buffer: Vec::new(),
            trail_color_buffer: Vec::new(),
            instance_ranges: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ShowSettings {
        &self.settings
    }

    pub fn pool(&self) -> &FireworkPool {
        &self.pool
    }

    /// Direct pool access, for scripted shows and tests that steer
    /// individual particles
    pub fn pool_mut(&mut self) -> &mut FireworkPool {
        &mut self.pool
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> ShowStats {
        self.stats
    }

    /// Spawn a burst at a world-space point
    pub fn spawn(&mut self, position: Vec3, config: &SpawnConfig) -> FireworkId {
        let id = self.ids.next_id();
        let firework = spawn_firework(&mut self.rng, id, position, config, &self.settings);
        debug!(
            "spawn {id}: {} particles, style {}, life {:.2}s",
            firework.particle_count,
            firework.style.name(),
            firework.life
        );
        self.insert(firework, config.apply_cap.unwrap_or(true));
        id
    }

    /// Spawn only if the input produced a usable point; a miss or a
    /// non-finite point is not an error, it just spawns nothing
    pub fn spawn_at(&mut self, position: Option<Vec3>, config: &SpawnConfig) -> Option<FireworkId> {
        match position {
            Some(p) if p.is_finite() => Some(self.spawn(p, config)),
            Some(p) => {
                debug!("ignoring spawn at non-finite point {p:?}");
                None
            }
            None => None,
        }
    }

    fn insert(&mut self, firework: Firework, apply_cap: bool) {
        self.sink.on_spawn(firework.id, &firework);
        self.pool.push(firework);
        self.stats.spawned += 1;

        if apply_cap {
            for evicted in self.pool.evict_over_capacity() {
                debug!("evict {} (pool over {})", evicted.id, self.pool.max_active());
                self.sink.release(evicted.id);
                self.stats.evicted += 1;
            }
        }
        self.record_peaks();
    }

    /// Advance every burst by `delta` seconds.
    ///
    /// Bursts spawned by fizzles during this pass are added after it and
    /// first age on the next call. Expired bursts are removed in a single
    /// compaction step once every pre-existing burst has been visited.
    pub fn advance(&mut self, delta: f32) -> FrameReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let mut fizzles: Vec<FizzleRequest> = Vec::new();

        for firework in self.pool.iter_mut() {
            step_firework(&mut self.rng, firework, &self.settings, delta, &mut fizzles);
        }
        let advanced = self.pool.len();

        let expired = self.pool.remove_expired();
        for firework in &expired {
            debug!("expire {} at age {:.2}s", firework.id, firework.age);
            self.sink.release(firework.id);
        }
        self.stats.expired += expired.len() as u64;

        for firework in self.pool.iter() {
            self.sink.mark_dirty(firework.id, firework);
        }

        for request in &fizzles {
            let id = self.ids.next_id();
            let config = SpawnConfig::fizzle(request.color);
            let firework =
                spawn_firework(&mut self.rng, id, request.position, &config, &self.settings);
            trace!(
                "fizzle {id} at ({:.2}, {:.2}, {:.2})",
                request.position.x,
                request.position.y,
                request.position.z
            );
            self.insert(firework, false);
        }
        self.stats.fizzles += fizzles.len() as u64;
        self.stats.frames += 1;

        FrameReport {
            advanced,
            expired: expired.len(),
            fizzles: fizzles.len(),
        }
    }

    /// Release every burst and empty the pool
    pub fn clear(&mut self) {
        for firework in self.pool.drain_all() {
            self.sink.release(firework.id);
        }
        self.clear_packed();
    }

    fn clear_packed(&mut self) {
        self.instance_buffer.clear();
        self.trail_buffer.clear();
        self.trail_color_buffer.clear();
        self.instance_ranges.clear();
    }

    /// Pack every particle and trail sample for GPU upload.
    /// Call this after `advance()`.
    pub fn pack_instances(&mut self) {
        self.clear_packed();

        for firework in self.pool.iter() {
            let start = self.instance_buffer.len();
            for p in 0..firework.particle_count {
                self.instance_buffer
                    .push(ParticleInstance::from_particle(firework, p));
            }

            let trail_start = self.trail_buffer.len();
            self.trail_buffer.extend(firework.trail.ordered());
            self.trail_color_buffer.extend(firework.trail_colors());

            self.instance_ranges.push(PackedRange {
                id: firework.id,
                start,
                count: firework.particle_count,
                trail_start,
                trail_len: self.trail_buffer.len() - trail_start,
                params: firework.render,
                trail_persistent: firework.trail_persistent,
                trail_segments: firework.trail_segments(),
            });
        }
    }

    /// Get the packed instance data
    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instance_buffer
    }

    /// Draw data for each burst, as of the last `pack_instances`
    pub fn draw_data(&self) -> Vec<FireworkDrawData<'_>> {
        self.instance_ranges
            .iter()
            .map(|range| {
                let trail = range.trail_start..range.trail_start + range.trail_len;
                FireworkDrawData {
                    id: range.id,
                    instances: &self.instance_buffer[range.start..range.start + range.count],
                    params: range.params,
                    trail_persistent: range.trail_persistent,
                    trail_segments: range.trail_segments,
                    trail: &self.trail_buffer[trail.clone()],
                    trail_colors: &self.trail_color_buffer[trail],
                }
            })
            .collect()
    }

    fn record_peaks(&mut self) {
        self.stats.peak_active = self.stats.peak_active.max(self.pool.len());
        self.stats.peak_particles = self
            .stats
            .peak_particles
            .max(self.pool.total_particles());
    }
}

impl<S: RenderSink> FrameSystem for FireworkShow<S> {
    fn initialize(&mut self) -> Result<()> {
        info!(
            "[fireworks] max_active={}, gravity={:?}, seed={:?}",
            self.settings.max_active, self.settings.gravity, self.settings.seed
        );
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        self.advance(dt as f32);
        self.pack_instances();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        info!(
            "[fireworks] shutting down with {} active burst(s)",
            self.pool.len()
        );
        self.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "fireworks"
    }
}

impl<S: RenderSink> Drop for FireworkShow<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
