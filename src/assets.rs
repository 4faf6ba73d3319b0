//! Keyed, process-wide specimen model cache.
//!
//! [`ModelCache`] owns the asset-loading lifecycle for the showcase:
//! `Unrequested → Loading → Ready | Failed`. Decoding runs on a background
//! thread; the frame loop never blocks on it. Readiness is strictly
//! poll-based (there are no completion callbacks), so a load that finishes
//! after its requesting subtree was torn down simply lands in the cache and
//! is never observed by the dead subtree.
//!
//! The cache is an explicit value, cloned and handed to whoever needs it
//! (clones share storage). Successful entries are immutable and never
//! evicted; a failed entry stays failed and renders as the placeholder.
//!
//! # Example
//!
//! ```
//! use vitrine::{ModelCache, LoadState};
//!
//! let cache = ModelCache::new();
//! cache.request("assets/specimen.stl");
//! // ...per frame:
//! match cache.state("assets/specimen.stl") {
//!     LoadState::Ready => { let _model = cache.get("assets/specimen.stl"); }
//!     _ => { /* draw the placeholder */ }
//! }
//! ```

use crate::model::{ModelError, RawModel};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Lifecycle of a cache entry, as observed by pollers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// The key has never been requested.
    Unrequested,
    /// A decode is in flight.
    Loading,
    /// The model is decoded and shared read-only.
    Ready,
    /// The decode failed; the error string is recorded.
    Failed,
}

enum Entry {
    Loading,
    Ready(Arc<RawModel>),
    Failed(String),
}

type Loader = Arc<dyn Fn(&str) -> Result<RawModel, ModelError> + Send + Sync>;

/// Shared model cache with at-most-one in-flight decode per key.
#[derive(Clone)]
pub struct ModelCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    loader: Loader,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCache {
    /// Cache backed by the default file loader: decode from disk, then
    /// apply the showcase framing preset.
    pub fn new() -> Self {
        Self::with_loader(|key| RawModel::from_file(key).map(RawModel::framed))
    }

    /// Cache backed by a custom loader. Used by tests and by hosts that
    /// fetch model bytes themselves.
    pub fn with_loader(
        loader: impl Fn(&str) -> Result<RawModel, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            loader: Arc::new(loader),
        }
    }

    /// Ensure a load for `key` is in flight or finished.
    ///
    /// The first request transitions the key to `Loading` and spawns the
    /// decode; any request while `Loading`, `Ready`, or `Failed` is a no-op
    /// (no duplicate decode work, no retry of failures).
    pub fn request(&self, key: &str) {
        {
            let mut entries = self.entries.lock().unwrap();
            if entries.contains_key(key) {
                return;
            }
            entries.insert(key.to_owned(), Entry::Loading);
        }

        let entries = Arc::clone(&self.entries);
        let loader = Arc::clone(&self.loader);
        let key = key.to_owned();
        std::thread::spawn(move || {
            let result = loader(&key);
            let entry = match result {
                Ok(model) => {
                    log::debug!("model '{}' decoded ({} vertices)", key, model.vertices.len());
                    Entry::Ready(Arc::new(model))
                }
                Err(e) => {
                    log::warn!("model '{}' failed to load: {}", key, e);
                    Entry::Failed(e.to_string())
                }
            };
            entries.lock().unwrap().insert(key, entry);
        });
    }

    /// Current lifecycle state for `key`. Never blocks.
    pub fn state(&self, key: &str) -> LoadState {
        match self.entries.lock().unwrap().get(key) {
            None => LoadState::Unrequested,
            Some(Entry::Loading) => LoadState::Loading,
            Some(Entry::Ready(_)) => LoadState::Ready,
            Some(Entry::Failed(_)) => LoadState::Failed,
        }
    }

    /// The decoded model, if `key` is `Ready`.
    pub fn get(&self, key: &str) -> Option<Arc<RawModel>> {
        match self.entries.lock().unwrap().get(key) {
            Some(Entry::Ready(model)) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    /// The recorded error, if `key` is `Failed`.
    pub fn error(&self, key: &str) -> Option<String> {
        match self.entries.lock().unwrap().get(key) {
            Some(Entry::Failed(message)) => Some(message.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn wait_for(cache: &ModelCache, key: &str, state: LoadState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while cache.state(key) != state {
            assert!(Instant::now() < deadline, "timed out waiting for {state:?}");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn unknown_keys_are_unrequested() {
        let cache = ModelCache::with_loader(|_| Ok(RawModel::placeholder()));
        assert_eq!(cache.state("nope"), LoadState::Unrequested);
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn request_decodes_in_background_and_becomes_ready() {
        let cache = ModelCache::with_loader(|_| Ok(RawModel::placeholder()));
        cache.request("specimen");
        wait_for(&cache, "specimen", LoadState::Ready);

        let model = cache.get("specimen").expect("ready model");
        assert_eq!(model.vertices.len(), RawModel::placeholder().vertices.len());
    }

    #[test]
    fn at_most_one_decode_per_key() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let (release, gate) = mpsc::channel::<()>();
        let gate = Mutex::new(gate);

        let cache = ModelCache::with_loader(move |_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            // Hold the load open so repeated requests observe `Loading`.
            let _ = gate.lock().unwrap().recv();
            Ok(RawModel::placeholder())
        });

        cache.request("specimen");
        wait_for(&cache, "specimen", LoadState::Loading);
        cache.request("specimen");
        cache.request("specimen");

        release.send(()).unwrap();
        wait_for(&cache, "specimen", LoadState::Ready);
        cache.request("specimen");
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_recorded_and_not_retried() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let cache = ModelCache::with_loader(|key| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Err(ModelError::UnknownFormat(key.to_owned()))
        });

        cache.request("broken");
        wait_for(&cache, "broken", LoadState::Failed);
        assert!(cache.error("broken").unwrap().contains("broken"));
        assert!(cache.get("broken").is_none());

        cache.request("broken");
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state("broken"), LoadState::Failed);
    }

    #[test]
    fn clones_share_storage() {
        let cache = ModelCache::with_loader(|_| Ok(RawModel::placeholder()));
        let clone = cache.clone();
        cache.request("shared");
        wait_for(&clone, "shared", LoadState::Ready);
        assert!(clone.get("shared").is_some());
    }

    #[test]
    fn distinct_keys_load_independently() {
        let cache = ModelCache::with_loader(|key| {
            if key == "bad" {
                Err(ModelError::Decode("corrupt".into()))
            } else {
                Ok(RawModel::placeholder())
            }
        });
        cache.request("good");
        cache.request("bad");
        wait_for(&cache, "good", LoadState::Ready);
        wait_for(&cache, "bad", LoadState::Failed);
    }
}
