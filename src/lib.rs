//! Aquarium Engine
//!
//! Procedural locomotion and animation blending for creatures swimming in an
//! orthographic tank.
//!
//! The engine is split into crates that this umbrella re-exports:
//!
//! - [`common`]: errors, scalar math, frame timer, per-creature randomness
//! - [`animation`]: keyframe clips, actions and the crossfading mixer
//! - [`scene`]: scene graphs, bounding boxes, render transforms, viewport
//! - [`assets`]: the loader boundary and async load dispatch
//! - [`motion`]: normalization, lanes, the motion controller and blender
//! - [`app`]: the creature arena, frame scheduler and tank configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use aquarium::{Aquarium, AquariumConfig, AssetServer, FileLoader, LoadTicket};
//!
//! let config = AquariumConfig::from_file("tank.json")?;
//! let server: AssetServer<_, LoadTicket> = AssetServer::new(FileLoader::new("assets"))?;
//! let mut tank = Aquarium::with_dispatcher(&config, server)?;
//!
//! loop {
//!     let frame = tank.tick(1.0 / 60.0);
//!     // hand frame.creatures to the renderer
//! }
//! ```

pub use aqua_animation as animation;
pub use aqua_app as app;
pub use aqua_assets as assets;
pub use aqua_core as common;
pub use aqua_motion as motion;
pub use aqua_scene as scene;

pub use aqua_app::{Aquarium, AquariumConfig, CreatureFrame, CreatureKey, FrameOutput, FrameScheduler, LoadTicket};
pub use aqua_assets::{AssetLoader, AssetRef, AssetServer, FileLoader, LoadedAsset, MemoryLoader};
pub use aqua_core::{AquaError, LoadError, Result};
pub use aqua_motion::{
    AnimationBlender, BoundaryPolicy, Creature, CreatureConfig, LaneAllocator, MotionController, StartSide,
};
pub use aqua_scene::{BoundingBox, RenderTransform, SceneGraph, Viewport};
