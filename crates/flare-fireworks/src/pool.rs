//! Ordered, capacity-bounded collection of active bursts

use crate::firework::Firework;

/// Insertion-ordered pool. Index 0 is always the oldest burst, and removals
/// never change the relative order of the rest.
pub struct FireworkPool {
    fireworks: Vec<Firework>,
    max_active: usize,
}

impl FireworkPool {
    pub fn new(max_active: usize) -> Self {
        Self {
            fireworks: Vec::new(),
            max_active: max_active.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    pub fn is_over_capacity(&self) -> bool {
        self.fireworks.len() > self.max_active
    }

    pub fn push(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }

    /// Remove exactly the entry at `index`, shifting later entries down
    pub fn remove_at(&mut self, index: usize) -> Option<Firework> {
        if index < self.fireworks.len() {
            Some(self.fireworks.remove(index))
        } else {
            None
        }
    }

    /// Remove oldest entries until the pool is back within capacity
    pub fn evict_over_capacity(&mut self) -> Vec<Firework> {
        let excess = self.fireworks.len().saturating_sub(self.max_active);
        self.fireworks.drain(..excess).collect()
    }

    /// Take out every expired burst in one compaction pass, keeping the
    /// survivors in order
    pub fn remove_expired(&mut self) -> Vec<Firework> {
        let (expired, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fireworks)
            .into_iter()
            .partition(Firework::is_expired);
        self.fireworks = alive;
        expired
    }

    /// Empty the pool, returning everything it held oldest first
    pub fn drain_all(&mut self) -> Vec<Firework> {
        std::mem::take(&mut self.fireworks)
    }

    pub fn get(&self, index: usize) -> Option<&Firework> {
        self.fireworks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Firework> {
        self.fireworks.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Firework> {
        self.fireworks.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Firework> {
        self.fireworks.iter_mut()
    }

    /// Particles across every burst in the pool
    pub fn total_particles(&self) -> usize {
        self.fireworks.iter().map(|f| f.particle_count).sum()
    }
}
