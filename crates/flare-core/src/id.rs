//! Firework identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one burst for the lifetime of a show.
///
/// The pool itself only cares about array position; the id exists so a
/// renderer can associate GPU-side resources with a burst and release them
/// when the burst goes away.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FireworkId(pub u64);

impl FireworkId {
    /// Create a FireworkId from a raw value (for deserialization/testing)
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for FireworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FireworkId({})", self.0)
    }
}

impl fmt::Display for FireworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source owned by a single show.
///
/// Each show keeps its own counter so seeded runs hand out the same ids.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> FireworkId {
        let id = FireworkId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
