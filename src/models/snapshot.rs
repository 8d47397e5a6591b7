//! Snapshot DTOs for cache diagnostics
//!
//! Serializable views of the cache contents and counters. Diagnostic output
//! only; the layout is not a stable format.

use serde::Serialize;

use crate::cache::CacheStats;

/// One cached entry as captured by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot<K, V> {
    pub key: K,
    pub value: V,
}

/// Cache contents ordered from least to most recently used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot<K, V> {
    /// Maximum number of entries
    pub capacity: usize,
    /// Number of entries at capture time
    pub len: usize,
    /// Entries, coldest first
    pub entries: Vec<EntrySnapshot<K, V>>,
}

impl<K, V> CacheSnapshot<K, V> {
    /// Keys in recency order, coldest first.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }
}

/// Counter report including the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<&CacheStats> for StatsReport {
    fn from(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            inserts: stats.inserts,
            updates: stats.updates,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}
