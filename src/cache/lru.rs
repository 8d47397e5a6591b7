//! LRU Cache Module
//!
//! Main cache engine combining a HashMap index with the recency list.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::list::{self, RecencyList};
use crate::cache::record::SlotId;
use crate::cache::{CacheStats, MIN_CAPACITY};
use crate::error::{CacheError, Result};
use crate::models::{CacheSnapshot, EntrySnapshot};

// == LRU Cache ==
/// Bounded key/value cache that evicts the least recently used entry.
///
/// Every entry lives in the index (by key) and in the recency list (by
/// position). Each public method leaves both in agreement, and the entry
/// count never exceeds `capacity` once a method returns.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key to slot lookup
    index: HashMap<K, SlotId>,
    /// Records ordered from least to most recently used
    list: RecencyList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        debug!(capacity, "created LRU cache");
        Ok(Self {
            index: HashMap::with_capacity(capacity.min(1024)),
            list: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Looks up a value and marks it as most recently used.
    ///
    /// Returns None if the key is absent; the cache is left untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).map(|value| &*value)
    }

    /// Like [`get`](Self::get), but yields mutable access to the value.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.list.move_to_back(id);
        self.list.get_mut(id).map(|record| &mut record.value)
    }

    // == Put ==
    /// Inserts or overwrites a value and marks it as most recently used.
    ///
    /// Storing a new key into a full cache evicts the least recently used
    /// entry, which is returned. Overwrites never evict.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(record) = self.list.get_mut(id) {
                record.value = value;
            }
            self.list.move_to_back(id);
            self.stats.record_update();
            return None;
        }

        let id = self.list.push_back(key.clone(), value);
        self.index.insert(key, id);
        self.stats.record_insert();

        // A single insert can overshoot capacity by at most one entry
        if self.index.len() > self.capacity {
            self.evict()
        } else {
            None
        }
    }

    // == Peek ==
    /// Looks up a value without changing recency or statistics.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|record| &record.value)
    }

    /// Checks whether a key is cached, without changing recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|record| record.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let record = self.list.pop_front()?;
        self.index.remove(&record.key);
        Some(record.into_parts())
    }

    /// The entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.front().map(|record| (&record.key, &record.value))
    }

    /// The most recently used entry.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|record| (&record.key, &record.value))
    }

    // == Clear ==
    /// Removes every entry. Capacity and statistics are kept.
    pub fn clear(&mut self) {
        let dropped = self.index.len();
        self.index.clear();
        self.list.clear();
        debug!(dropped, "cleared LRU cache");
    }

    // == Size ==
    /// Returns the current number of entries.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Snapshot ==
    /// Captures the cache contents, coldest first.
    pub fn snapshot(&self) -> CacheSnapshot<K, V>
    where
        V: Clone,
    {
        CacheSnapshot {
            capacity: self.capacity,
            len: self.index.len(),
            entries: self
                .iter()
                .map(|(key, value)| EntrySnapshot {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    // == Check Invariants ==
    /// Verifies that the index and the recency list describe the same entries.
    ///
    /// Walks the whole list, so this is O(n). Intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<()> {
        let ids = self.list.validate()?;

        if self.list.len() != self.index.len() || ids.len() != self.index.len() {
            return Err(CacheError::Corrupted(format!(
                "index holds {} keys but the list holds {} records",
                self.index.len(),
                ids.len()
            )));
        }
        if ids.len() > self.capacity {
            return Err(CacheError::Corrupted(format!(
                "{} entries exceed capacity {}",
                ids.len(),
                self.capacity
            )));
        }

        for id in ids {
            let indexed = self
                .list
                .get(id)
                .and_then(|record| self.index.get(&record.key));
            if indexed != Some(&id) {
                return Err(CacheError::Corrupted(format!(
                    "slot {} is not indexed by its own key",
                    id.index()
                )));
            }
        }

        Ok(())
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let record = self.list.pop_front()?;
        self.index.remove(&record.key);
        self.stats.record_eviction();
        trace!(
            len = self.index.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );
        Some(record.into_parts())
    }
}

// == Display ==
impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LruCache({}/{}) [", self.len(), self.capacity)?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("]")
    }
}

// == Iterator ==
/// Iterator over cache entries, least recently used first.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|record| (&record.key, &record.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|record| (&record.key, &record.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
