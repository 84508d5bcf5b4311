//! Image cache keyed by source locator.
//!
//! `resolve` never blocks: a miss records a pending entry, starts the load on the tokio
//! runtime and hands back the entry's handle at once. Finished loads are queued on a
//! channel and only become visible when the owner drains it with
//! [`ImageCache::poll_completions`] (or awaits one), so the state of an entry cannot
//! change in the middle of a render pass.

use crate::assets::loader::ImageLoader;
use crate::errors::LoadError;
use crate::render::RgbaImage;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Load state of a cached image.
#[derive(Debug, Clone)]
pub enum ImageState {
    Pending,
    Ready(Arc<RgbaImage>),
    /// The load failed; holds the reason.
    Failed(String),
}

/// Shared handle to a cache entry. The same handle is returned for every resolve of a key.
#[derive(Debug)]
pub struct ImageHandle {
    key: String,
    state: RwLock<ImageState>,
}

impl ImageHandle {
    fn new(key: String) -> Self {
        Self {
            key,
            state: RwLock::new(ImageState::Pending),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> ImageState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Natural pixel size; `(0, 0)` until the image is ready.
    pub fn dimensions(&self) -> (u32, u32) {
        match &*self.state.read().unwrap_or_else(|e| e.into_inner()) {
            ImageState::Ready(image) => (image.width, image.height),
            _ => (0, 0),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state(), ImageState::Pending)
    }

    fn set(&self, state: ImageState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

/// A finished load waiting to be applied to its entry.
#[derive(Debug)]
pub struct LoadCompletion {
    pub key: String,
    pub result: Result<RgbaImage, LoadError>,
}

pub struct ImageCache {
    entries: HashMap<String, Arc<ImageHandle>>,
    /// Loads that have not been applied yet, by key.
    in_flight: HashMap<String, JoinHandle<()>>,
    loader: Arc<dyn ImageLoader>,
    runtime: Handle,
    timeout: Duration,
    done_tx: mpsc::UnboundedSender<LoadCompletion>,
    done_rx: mpsc::UnboundedReceiver<LoadCompletion>,
}

impl ImageCache {
    pub fn new(loader: Arc<dyn ImageLoader>, runtime: Handle, timeout: Duration) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            loader,
            runtime,
            timeout,
            done_tx,
            done_rx,
        }
    }

    /// Returns the handle for `key`, starting a load on the first request.
    pub fn resolve(&mut self, key: &str) -> Arc<ImageHandle> {
        if let Some(handle) = self.entries.get(key) {
            return handle.clone();
        }

        log::debug!("image cache miss: {key}");
        let handle = Arc::new(ImageHandle::new(key.to_string()));
        self.entries.insert(key.to_string(), handle.clone());

        let load = self.loader.load(key);
        let timeout = self.timeout;
        let tx = self.done_tx.clone();
        let owned_key = key.to_string();
        let task = self.runtime.spawn(async move {
            let result = match tokio::time::timeout(timeout, load).await {
                Ok(result) => result,
                Err(_) => Err(LoadError::Timeout(timeout)),
            };
            // The receiver is gone only when the cache was dropped.
            let _ = tx.send(LoadCompletion { key: owned_key, result });
        });
        self.in_flight.insert(key.to_string(), task);

        handle
    }

    /// Looks up `key` without starting a load.
    pub fn get(&self, key: &str) -> Option<Arc<ImageHandle>> {
        self.entries.get(key).cloned()
    }

    /// Applies every load that has finished so far. Returns the keys of the entries that
    /// changed.
    pub fn poll_completions(&mut self) -> Vec<String> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.done_rx.try_recv() {
            applied.push(completion.key.clone());
            self.apply(completion);
        }
        applied
    }

    /// Waits for the next finished load. Never resolves while nothing is in flight.
    pub async fn next_completion(&mut self) -> LoadCompletion {
        if self.in_flight.is_empty() {
            return std::future::pending().await;
        }
        match self.done_rx.recv().await {
            Some(completion) => completion,
            // The cache holds a sender, so the channel never closes.
            None => std::future::pending().await,
        }
    }

    /// Moves the entry for a finished load to `Ready` or `Failed`.
    pub fn apply(&mut self, completion: LoadCompletion) {
        let LoadCompletion { key, result } = completion;
        self.in_flight.remove(&key);

        let Some(handle) = self.entries.get(&key) else {
            return;
        };
        match result {
            Ok(image) => {
                log::debug!("image loaded: {key} ({}x{})", image.width, image.height);
                handle.set(ImageState::Ready(Arc::new(image)));
            }
            Err(e) => {
                log::warn!("image load failed: {key}: {e}");
                handle.set(ImageState::Failed(e.to_string()));
            }
        }
    }

    /// Waits until every load started so far has been applied.
    pub async fn settle(&mut self) {
        self.poll_completions();
        while !self.in_flight.is_empty() {
            let completion = self.next_completion().await;
            self.apply(completion);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for ImageCache {
    fn drop(&mut self) {
        for (key, task) in self.in_flight.drain() {
            log::debug!("aborting image load: {key}");
            task.abort();
        }
    }
}
