//! Foundational types shared by every Aquarium crate.
//!
//! - [`errors`]: [`AquaError`] and the loader-facing [`LoadError`]
//! - [`math`]: total scalar helpers (smoothing, angle wrapping)
//! - [`random`]: injectable creature-local random sources
//! - [`time`]: wall-clock frame timer

pub mod errors;
pub mod math;
pub mod random;
pub mod time;

pub use errors::{AquaError, LoadError, Result};
pub use random::{CreatureRng, RandomSource, ValueRange, creature_seed};
pub use time::Timer;
