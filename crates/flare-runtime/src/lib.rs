//! Flare Runtime - Frame driver infrastructure
//!
//! Provides the pieces a host uses to drive a simulation:
//! - `FrameClock` — per-frame delta with a clamp against long stalls
//! - `SpawnThrottle` — rate limit for spawn requests while a pointer is held
//! - `FrameSystem` — trait for systems ticked once per frame

mod clock;
mod system;
mod throttle;

pub use clock::FrameClock;
pub use system::FrameSystem;
pub use throttle::SpawnThrottle;
