//! Renderer-facing types: lifecycle callbacks and GPU instance data

use crate::curves::RenderParams;
use crate::firework::Firework;
use bytemuck::{Pod, Zeroable};
use flare_core::FireworkId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Sparks draw slightly larger than ordinary particles
const SPARK_SIZE_SCALE: f32 = 1.4;

/// Receives burst lifecycle notifications from a show.
///
/// `release` is called exactly once for every burst passed to `on_spawn`,
/// whether it expires, is evicted, or the show is cleared or dropped.
pub trait RenderSink {
    /// A burst entered the pool
    fn on_spawn(&mut self, id: FireworkId, firework: &Firework);

    /// A burst's buffers changed this frame
    fn mark_dirty(&mut self, id: FireworkId, firework: &Firework);

    /// A burst left the pool; free anything tied to it
    fn release(&mut self, id: FireworkId);
}

/// Sink that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn on_spawn(&mut self, _id: FireworkId, _firework: &Firework) {}
    fn mark_dirty(&mut self, _id: FireworkId, _firework: &Firework) {}
    fn release(&mut self, _id: FireworkId) {}
}

/// What a `RecordingSink` has seen so far
#[derive(Debug, Default, Clone)]
pub struct SinkLog {
    pub spawned: Vec<FireworkId>,
    pub released: Vec<FireworkId>,
    pub dirty_marks: u64,
    /// Bursts spawned but not yet released
    pub live: HashMap<FireworkId, usize>,
}

impl SinkLog {
    pub fn release_count(&self, id: FireworkId) -> usize {
        self.released.iter().filter(|r| **r == id).count()
    }
}

/// Sink that records every call. Clones share the same log, so a caller can
/// keep one handle while the show owns the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SinkLog {
        self.log.borrow().clone()
    }
}

impl RenderSink for RecordingSink {
    fn on_spawn(&mut self, id: FireworkId, firework: &Firework) {
        let mut log = self.log.borrow_mut();
        log.spawned.push(id);
        log.live.insert(id, firework.particle_count);
    }

    fn mark_dirty(&mut self, _id: FireworkId, _firework: &Firework) {
        self.log.borrow_mut().dirty_marks += 1;
    }

    fn release(&mut self, id: FireworkId) {
        let mut log = self.log.borrow_mut();
        log.released.push(id);
        log.live.remove(&id);
    }
}

/// GPU instance data for one particle point sprite.
/// 32 bytes (2 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position + point size packed into vec4
    pub pos_size: [f32; 4], // xyz = position, w = size
    /// Colour with the age fade already applied; alpha stays 1 so the
    /// renderer must not multiply by the fade again
    pub color: [f32; 4], // rgba
}

impl ParticleInstance {
    pub fn from_particle(firework: &Firework, p: usize) -> Self {
        let pos = firework.position(p);
        let color = firework.color(p);
        let size = if firework.is_spark[p] {
            firework.render.point_size * SPARK_SIZE_SCALE
        } else {
            firework.render.point_size
        };
        Self {
            pos_size: [pos.x, pos.y, pos.z, size],
            color: [color.r, color.g, color.b, 1.0],
        }
    }
}

/// Draw data for one burst, consumed by the renderer
pub struct FireworkDrawData<'a> {
    pub id: FireworkId,
    pub instances: &'a [ParticleInstance],
    pub params: RenderParams,
    pub trail_persistent: bool,
    pub trail_segments: usize,
    /// Trail samples, most-recent-first per particle
    pub trail: &'a [f32],
    /// Per-sample faded colours matching `trail`
    pub trail_colors: &'a [f32],
}
