//! Rate limit for spawn requests coming from a held pointer

use log::trace;

/// Default minimum spacing between spawn requests, in milliseconds
pub const DEFAULT_INTERVAL_MS: f64 = 16.0;

/// Lets at most one spawn request through per interval while the pointer is
/// held. A fresh press always fires immediately.
#[derive(Debug, Clone)]
pub struct SpawnThrottle {
    interval_ms: f64,
    held: bool,
    last_fire_ms: Option<f64>,
}

impl SpawnThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            held: false,
            last_fire_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Pointer went down at `now_ms`. Returns true if a spawn should happen.
    pub fn press(&mut self, now_ms: f64) -> bool {
        self.held = true;
        self.last_fire_ms = Some(now_ms);
        true
    }

    /// Pointer moved or the frame ticked while held. Returns true if a spawn
    /// should happen.
    pub fn hold(&mut self, now_ms: f64) -> bool {
        if !self.held {
            return false;
        }
        match self.last_fire_ms {
            Some(last) if now_ms - last < self.interval_ms => {
                trace!("spawn throttled ({:.1}ms since last)", now_ms - last);
                false
            }
            _ => {
                self.last_fire_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn release(&mut self) {
        self.held = false;
    }
}

impl Default for SpawnThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_always_fires() {
        let mut throttle = SpawnThrottle::default();
        assert!(throttle.press(0.0));
        throttle.release();
        assert!(throttle.press(1.0));
    }

    #[test]
    fn hold_respects_interval() {
        let mut throttle = SpawnThrottle::new(16.0);
        assert!(throttle.press(100.0));
        assert!(!throttle.hold(110.0));
        assert!(throttle.hold(116.0));
        assert!(!throttle.hold(120.0));
        assert!(throttle.hold(140.0));
    }

    #[test]
    fn hold_without_press_never_fires() {
        let mut throttle = SpawnThrottle::default();
        assert!(!throttle.hold(1000.0));
        throttle.press(0.0);
        throttle.release();
        assert!(!throttle.hold(1000.0));
    }
}
