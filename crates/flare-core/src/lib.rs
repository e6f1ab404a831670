//! Flare Core - Foundational types for the Flare fireworks simulation
//!
//! This crate provides the types that all other Flare crates depend on:
//! - `FireworkId` - Identifier handed to renderers for one burst
//! - `Rgb` - Linear colour with HSL conversion
//! - Error types and Result alias

mod color;
mod error;
mod id;

pub use color::{Hsl, Rgb};
pub use error::{FlareError, Result};
pub use id::{FireworkId, IdAllocator};
