//! Async load dispatch.
//!
//! Loads run on a tokio runtime, off the update thread. Each finished load is
//! sent back over a channel together with the caller's ticket; the update
//! thread drains the channel at the start of a frame and decides per ticket
//! whether the result is still wanted. There is no cancellation: an unwanted
//! result is simply dropped on arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aqua_core::{AquaError, LoadError, Result};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::loader::{AssetLoader, AssetRef, LoadedAsset};

/// A finished load, tagged with the ticket it was requested under.
#[derive(Debug)]
pub struct LoadCompletion<T> {
    pub ticket: T,
    pub source: AssetRef,
    pub result: std::result::Result<LoadedAsset, LoadError>,
}

enum RuntimeSlot {
    Owned(Option<Runtime>),
    Shared(Handle),
}

impl RuntimeSlot {
    fn handle(&self) -> Option<Handle> {
        match self {
            RuntimeSlot::Owned(rt) => rt.as_ref().map(|rt| rt.handle().clone()),
            RuntimeSlot::Shared(handle) => Some(handle.clone()),
        }
    }
}

impl Drop for RuntimeSlot {
    fn drop(&mut self) {
        if let RuntimeSlot::Owned(rt) = self
            && let Some(rt) = rt.take()
        {
            // Outstanding loads are abandoned; their results would be stale.
            rt.shutdown_background();
        }
    }
}

pub struct AssetServer<L: AssetLoader, T: Send + 'static> {
    loader: Arc<L>,
    runtime: RuntimeSlot,
    sender: flume::Sender<LoadCompletion<T>>,
    receiver: flume::Receiver<LoadCompletion<T>>,
    in_flight: Arc<AtomicUsize>,
}

impl<L: AssetLoader, T: Send + 'static> AssetServer<L, T> {
    /// Creates a server with its own small multi-thread runtime.
    pub fn new(loader: L) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("aqua-asset-loader")
            .enable_all()
            .build()
            .map_err(|e| AquaError::RuntimeError(e.to_string()))?;
        Ok(Self::with_slot(loader, RuntimeSlot::Owned(Some(runtime))))
    }

    /// Creates a server that spawns onto an existing runtime.
    pub fn with_handle(loader: L, handle: Handle) -> Self {
        Self::with_slot(loader, RuntimeSlot::Shared(handle))
    }

    fn with_slot(loader: L, runtime: RuntimeSlot) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            loader: Arc::new(loader),
            runtime,
            sender,
            receiver,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn loader(&self) -> &Arc<L> {
        &self.loader
    }

    /// Starts loading `source`. Never blocks; the result arrives later
    /// through [`drain`](Self::drain).
    pub fn request(&self, ticket: T, source: AssetRef) {
        let Some(handle) = self.runtime.handle() else {
            log::error!("asset runtime is gone, dropping load of '{source}'");
            return;
        };

        let loader = Arc::clone(&self.loader);
        let sender = self.sender.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::AcqRel);
        log::debug!("loading '{source}'");

        handle.spawn(async move {
            let result = loader.load(&source).await;
            in_flight.fetch_sub(1, Ordering::AcqRel);
            if sender.send(LoadCompletion { ticket, source, result }).is_err() {
                log::debug!("asset server dropped before a load finished");
            }
        });
    }

    /// Every completion that has arrived since the last call.
    #[must_use]
    pub fn drain(&self) -> Vec<LoadCompletion<T>> {
        self.receiver.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next completion. Intended for tools and
    /// tests, never for the frame loop.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadCompletion<T>> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Loads requested but not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}
