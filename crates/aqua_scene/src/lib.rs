//! Scene-side data for creatures.
//!
//! - [`SceneGraph`]: flat per-creature node hierarchy with rest transforms
//! - [`Transform`]: local TRS with a dirty-checked matrix cache
//! - [`RenderTransform`]: the per-frame pivot transform handed to a renderer
//! - [`ViewportModel`]: orthographic viewport extents in world units

pub mod graph;
pub mod transform;
pub mod viewport;

pub use graph::{BoundingBox, SceneGraph, SceneNode};
pub use transform::{RenderTransform, Transform};
pub use viewport::{DEFAULT_WORLD_HEIGHT, Viewport, ViewportModel};
