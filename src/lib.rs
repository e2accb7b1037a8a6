//! evictkit: in-process cache engines with pluggable eviction policies.
//!
//! Five engines share one capability contract ([`traits::CachePolicy`]):
//! plain LRU, history-promoted LRU-K, sharded LRU, plain LFU, and an aging
//! LFU variant that bounds frequency growth. Each engine owns a single
//! `parking_lot::Mutex`, so all of them are safe to share across threads
//! behind an `Arc`.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let cache = LruCache::new(2);
//! cache.insert(1, "a");
//! cache.insert(2, "b");
//! cache.insert(3, "c"); // evicts key 1
//! assert!(cache.get(&1).is_none());
//! assert_eq!(cache.get(&3).as_deref(), Some(&"c"));
//! ```

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
