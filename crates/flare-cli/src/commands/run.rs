//! Run command — drives a show headlessly and reports what happened

use super::load_show_file;
use anyhow::{Context, Result};
use flare_fireworks::{FireworkShow, RecordingSink, ShowStats};
use flare_runtime::{FrameClock, FrameSystem, SpawnThrottle};
use glam::Vec3;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Half-width of the plane spawn points are drawn from
const SPAWN_EXTENT: f32 = 12.0;
/// Share of pointer requests that miss the reference plane
const MISS_RATE: f64 = 0.05;

pub struct RunArgs {
    pub config: Option<String>,
    pub frames: u64,
    pub dt: f64,
    pub seed: Option<u64>,
    pub spawn_every: u64,
    pub json: bool,
}

#[derive(Serialize)]
struct Summary {
    frames: u64,
    simulated_seconds: f64,
    requests: u64,
    missed: u64,
    active_at_end: usize,
    particles_at_end: usize,
    #[serde(flatten)]
    stats: ShowStats,
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut file = load_show_file(args.config.as_deref())?;
    if args.seed.is_some() {
        file.show.seed = args.seed;
    }

    let sink = RecordingSink::new();
    let mut show = FireworkShow::with_sink(file.show.clone(), sink.clone())
        .context("Invalid show settings")?;
    show.initialize()?;

    let mut pointer_rng = match file.show.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };
    let mut clock = FrameClock::new();
    let mut throttle = SpawnThrottle::default();
    let spawn_every = args.spawn_every.max(1);
    let (mut requests, mut missed) = (0u64, 0u64);

    for frame in 0..args.frames {
        clock.advance_by(args.dt);

        // The pointer goes down every `spawn_every` frames and is held for
        // a few frames, like a short drag
        let now = clock.total_millis();
        let fire = match frame % spawn_every {
            0 => throttle.press(now),
            1..=3 => throttle.hold(now),
            _ => {
                throttle.release();
                false
            }
        };

        if fire {
            requests += 1;
            let point = pick_point(&mut pointer_rng);
            if point.is_none() {
                missed += 1;
            }
            show.spawn_at(point, &file.spawn);
        }

        show.update(clock.delta_time)?;
    }

    let summary = Summary {
        frames: args.frames,
        simulated_seconds: clock.total_time,
        requests,
        missed,
        active_at_end: show.pool().len(),
        particles_at_end: show.pool().total_particles(),
        stats: show.stats(),
    };
    show.shutdown()?;
    drop(show);

    let log = sink.snapshot();
    info!(
        "renderer saw {} spawn(s), {} release(s), {} dirty mark(s)",
        log.spawned.len(),
        log.released.len(),
        log.dirty_marks
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Stand-in for pointer raycasting onto the reference plane
fn pick_point(rng: &mut StdRng) -> Option<Vec3> {
    if rng.random_bool(MISS_RATE) {
        return None;
    }
    Some(Vec3::new(
        rng.random_range(-SPAWN_EXTENT..SPAWN_EXTENT),
        rng.random_range(0.0..SPAWN_EXTENT),
        0.0,
    ))
}

fn print_summary(summary: &Summary) {
    println!(
        "Simulated {} frame(s) ({:.2}s)",
        summary.frames, summary.simulated_seconds
    );
    println!(
        "Spawn requests: {} ({} missed the plane)",
        summary.requests, summary.missed
    );
    println!("Bursts spawned: {}", summary.stats.spawned);
    println!("  fizzles:      {}", summary.stats.fizzles);
    println!("  evicted:      {}", summary.stats.evicted);
    println!("  expired:      {}", summary.stats.expired);
    println!(
        "Peak pool size: {} burst(s), {} particle(s)",
        summary.stats.peak_active, summary.stats.peak_particles
    );
    println!(
        "At end: {} burst(s), {} particle(s)",
        summary.active_at_end, summary.particles_at_end
    );
}
