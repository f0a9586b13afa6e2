//! The asset boundary.
//!
//! Decoding binary scene formats is not this crate's job. It defines what a
//! loader must return ([`LoadedAsset`]), how loads are dispatched off the
//! update thread ([`AssetServer`]), and two loaders: [`MemoryLoader`] for
//! programmatic assets (see [`FishBuilder`]) and [`FileLoader`] for JSON
//! descriptors on disk.

pub mod descriptor;
pub mod file;
pub mod loader;
pub mod memory;
pub mod procedural;
pub mod server;

pub use descriptor::AssetDescriptor;
pub use file::FileLoader;
pub use loader::{AssetLoader, AssetRef, LoadedAsset};
pub use memory::MemoryLoader;
pub use procedural::{FishBuilder, SWIM_CLIP_NAME};
pub use server::{AssetServer, LoadCompletion};
