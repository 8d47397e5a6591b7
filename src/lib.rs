//! Recency Cache - A bounded in-memory key/value cache
//!
//! Keeps at most `capacity` entries and evicts the least recently used one
//! when a new key would overflow it.
//!
//! ```
//! use recency_cache::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.get(&1);
//! cache.put(3, "c");
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"a"));
//! assert_eq!(cache.size(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheStats, LruCache, SharedLruCache};
pub use config::Config;
pub use error::{CacheError, Result};
