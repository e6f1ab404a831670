//! Frame clock with delta clamping

use std::time::Instant;

/// Longest frame the clock will report, in seconds
const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks elapsed time between frames
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Number of ticks since creation
    pub frame_count: u64,
    /// Upper bound for `delta_time`
    pub max_delta: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            max_delta: MAX_FRAME_TIME,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame_count += 1;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance_by(elapsed);
    }

    /// Advance the clock by a fixed amount, for headless drivers and tests.
    /// Negative and non-finite inputs count as zero.
    pub fn advance_by(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        // Clamp to avoid a burst of catch-up physics after a stall
        self.delta_time = dt.min(self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.first_tick = false;
    }

    /// Milliseconds of simulated time, for throttles keyed on wall time
    pub fn total_millis(&self) -> f64 {
        self.total_time * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut clock = FrameClock::new();
        clock.advance_by(2.0);
        assert!((clock.delta_time - MAX_FRAME_TIME).abs() < 1e-12);
        assert!((clock.total_time - MAX_FRAME_TIME).abs() < 1e-12);
    }

    #[test]
    fn test_advance_rejects_negative_and_nan() {
        let mut clock = FrameClock::new();
        clock.advance_by(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        clock.advance_by(f64::NAN);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn test_total_millis() {
        let mut clock = FrameClock::new();
        clock.advance_by(0.016);
        clock.advance_by(0.016);
        assert!((clock.total_millis() - 32.0).abs() < 1e-9);
    }
}
