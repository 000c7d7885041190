//! In-memory memo tables for converter output.
//!
//! ```text
//! cache/
//! ├── mod.rs     # BoundedCache (this file)
//! └── layers.rs  # the four tables and their key derivation
//! ```
//!
//! Every table is keyed by a [`ContentHash`] over its key parts and evicts
//! the least recently used entry once full.

mod layers;

pub use layers::Caches;

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::utils::hash::ContentHash;

/// A fixed-capacity LRU memo table.
///
/// Values are cloned out on hit, so large values should be wrapped in `Arc`.
pub struct BoundedCache<V> {
    name: &'static str,
    inner: Mutex<LruCache<ContentHash, V>>,
}

impl<V: Clone> BoundedCache<V> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up an entry, marking it most recently used.
    pub fn get(&self, key: &ContentHash) -> Option<V> {
        let hit = self.inner.lock().get(key).cloned();
        crate::debug!("cache"; "{} {} {}", self.name, if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    /// Insert an entry, evicting the least recently used one if full.
    pub fn insert(&self, key: ContentHash, value: V) {
        let mut inner = self.inner.lock();
        inner.put(key, value);
        crate::debug!("cache"; "{} holds {}/{}", self.name, inner.len(), inner.cap());
    }
}

#[cfg(test)]
impl<V: Clone> BoundedCache<V> {
    /// Membership without touching recency.
    pub fn contains(&self, key: &ContentHash) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().cap().get()
    }
}
