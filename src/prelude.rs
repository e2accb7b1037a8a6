//! Convenience re-exports for common usage.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let cache: LruCache<u64, String> = LruCache::new(128);
//! cache.put(1, "one".to_string());
//! assert!(cache.get(&1).is_some());
//! ```

pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::{
    AgingLfuCache, LfuCache, LruCache, LrukCache, ShardedLruCache, DEFAULT_MAX_AVERAGE,
};
pub use crate::traits::{CachePolicy, RemovableCachePolicy};
