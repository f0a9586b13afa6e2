use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aqua_core::LoadError;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::loader::{AssetLoader, AssetRef, LoadedAsset};

#[derive(Debug, Clone)]
enum MemoryEntry {
    Ready(LoadedAsset),
    Failing(LoadError),
    /// The load future never completes.
    Pending,
}

/// In-memory loader keyed by [`AssetRef`].
///
/// Every successful load returns a fresh clone of the registered asset, so
/// creatures sharing a reference never share a scene graph. An optional
/// latency is awaited before resolving; it requires a tokio runtime.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    entries: RwLock<FxHashMap<AssetRef, MemoryEntry>>,
    latency: Option<Duration>,
    requests: AtomicUsize,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    pub fn insert(&self, source: impl Into<AssetRef>, asset: LoadedAsset) {
        self.entries.write().insert(source.into(), MemoryEntry::Ready(asset));
    }

    /// Registers a reference whose load fails with `error`.
    pub fn insert_failing(&self, source: impl Into<AssetRef>, error: LoadError) {
        self.entries.write().insert(source.into(), MemoryEntry::Failing(error));
    }

    /// Registers a reference whose load never resolves.
    pub fn insert_pending(&self, source: impl Into<AssetRef>) {
        self.entries.write().insert(source.into(), MemoryEntry::Pending);
    }

    /// Number of `load` calls so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

impl AssetLoader for MemoryLoader {
    async fn load(&self, source: &AssetRef) -> Result<LoadedAsset, LoadError> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        // Clone out so the lock is not held across an await point.
        let entry = self.entries.read().get(source).cloned();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match entry {
            Some(MemoryEntry::Ready(asset)) => Ok(asset),
            Some(MemoryEntry::Failing(err)) => {
                log::warn!("load of '{source}' failed: {err}");
                Err(err)
            }
            Some(MemoryEntry::Pending) => futures::future::pending().await,
            None => {
                log::warn!("asset '{source}' is not registered");
                Err(LoadError::NotFound(source.to_string()))
            }
        }
    }
}
