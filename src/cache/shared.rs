//! Shared Cache Module
//!
//! Cloneable handle that serializes access to one `LruCache` across threads.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, LruCache};
use crate::error::Result;
use crate::models::CacheSnapshot;

/// Thread-safe handle to a single LRU cache.
///
/// Every method holds the lock for the whole operation, so promotion and
/// eviction are never observed half done. Clones share the same cache.
///
/// # Example
/// ```
/// use recency_cache::cache::SharedLruCache;
///
/// let cache = SharedLruCache::new(2).unwrap();
/// let writer = cache.clone();
/// std::thread::spawn(move || {
///     writer.put("a", 1);
/// })
/// .join()
/// .unwrap();
/// assert_eq!(cache.get("a"), Some(1));
/// ```
#[derive(Debug)]
pub struct SharedLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Looks up a value, promoting it, and returns a clone of it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().put(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn snapshot(&self) -> CacheSnapshot<K, V>
    where
        V: Clone,
    {
        self.inner.lock().snapshot()
    }

    // == With ==
    /// Runs `f` with exclusive access, making a sequence of calls atomic.
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
