//! Cache Module
//!
//! Provides a bounded in-memory cache with least-recently-used eviction.

mod list;
mod lru;
mod record;
mod shared;
mod stats;


// Re-export public types
pub use lru::{Iter, LruCache};
pub use shared::SharedLruCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Smallest capacity a cache can be built with
pub const MIN_CAPACITY: usize = 1;
