//! Procedural locomotion for swimming creatures.
//!
//! A [`Creature`] combines a [`MotionController`] (placement, boundary
//! easing, turns, vertical wave) with an [`AnimationBlender`] (clip
//! selection and crossfade, or motion-only). [`normalize`] sizes arbitrary
//! assets to the viewport and [`LaneAllocator`] spreads creatures over
//! vertical lanes.

pub mod blender;
pub mod controller;
pub mod creature;
pub mod drift;
pub mod lanes;
pub mod normalization;
pub mod params;

pub use blender::{AnimationBlender, ClipPlayer, select_clip};
pub use controller::{
    Bounds, Direction, Kinematics, MIN_SPEED_FACTOR, MotionController, Placement, SPAWN_INSET, StepReport,
    eased_speed, facing_yaw,
};
pub use creature::{Creature, CreatureBody, Reconfigured};
pub use drift::WaveDrift;
pub use lanes::LaneAllocator;
pub use normalization::{Footprint, normalize};
pub use params::{
    AnimationParams, BoundaryPolicy, CreatureConfig, CreatureParams, LanePreset, MotionParams, SizeParams,
    StartSide, WaveParams,
};
