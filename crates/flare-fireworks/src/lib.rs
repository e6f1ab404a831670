//! Flare Fireworks - particle firework simulation
//!
//! Provides the simulation core of an interactive fireworks display:
//! - Burst spawning with randomized style, colour, speed and drag
//! - Per-frame integration: drag, jitter, gravity, trails, ember fade
//! - Apex "fizzle" sub-bursts, queued and merged after each pass
//! - A capacity-bounded pool that evicts the oldest burst first
//! - GPU instance packing and renderer lifecycle callbacks

pub mod config;
pub mod curves;
pub mod firework;
pub mod integrator;
pub mod pool;
pub mod render;
pub mod sampler;
pub mod show;
pub mod spawner;
pub mod trail;

pub use config::{CountRange, FloatRange, ShowFile, ShowSettings, SpawnConfig};
pub use curves::RenderParams;
pub use firework::Firework;
pub use pool::FireworkPool;
pub use render::{FireworkDrawData, NullSink, ParticleInstance, RecordingSink, RenderSink};
pub use sampler::BurstStyle;
pub use show::{FireworkShow, FrameReport, ShowStats};
