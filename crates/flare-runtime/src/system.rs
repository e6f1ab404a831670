//! Frame system trait

use flare_core::Result;

/// A system that can be ticked by the frame driver
///
/// The driver calls `update` once per frame with the elapsed time. All work
/// inside `update` is synchronous; control only returns to the host between
/// frames.
pub trait FrameSystem {
    /// Called once before the first frame
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame with elapsed seconds
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
