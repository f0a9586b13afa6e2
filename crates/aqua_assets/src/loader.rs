use std::fmt;
use std::future::Future;
use std::sync::Arc;

use aqua_animation::AnimationClip;
use aqua_core::LoadError;
use aqua_scene::{BoundingBox, SceneGraph};
use serde::{Deserialize, Serialize};

/// Opaque reference to a creature asset.
///
/// The engine never interprets it; only the loader knows whether it names a
/// file, a bundled resource or a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Result of a successful load: one creature's own copy of the hierarchy,
/// its bounds and the clips it may play.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub scene: SceneGraph,
    pub bounds: BoundingBox,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl LoadedAsset {
    #[must_use]
    pub fn has_animation(&self) -> bool {
        !self.clips.is_empty()
    }
}

/// Asynchronous asset loader.
///
/// Caching and retry policy belong to the implementation; the engine calls
/// `load` once per request and treats any error as final.
pub trait AssetLoader: Send + Sync + 'static {
    fn load(&self, source: &AssetRef) -> impl Future<Output = Result<LoadedAsset, LoadError>> + Send;
}

impl<L: AssetLoader> AssetLoader for Arc<L> {
    fn load(&self, source: &AssetRef) -> impl Future<Output = Result<LoadedAsset, LoadError>> + Send {
        (**self).load(source)
    }
}
