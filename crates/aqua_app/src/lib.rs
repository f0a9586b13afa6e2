//! Tank-level glue: the creature arena, the frame driver and JSON
//! configuration.

pub mod aquarium;
pub mod config;
pub mod frame;

pub use aquarium::{Aquarium, CreatureKey, LoadDispatch, LoadOutcome, LoadTicket};
pub use config::{AquariumConfig, MotionSettings, ViewportConfig};
pub use frame::{CreatureFrame, FrameOutput, FrameScheduler};
