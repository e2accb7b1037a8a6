//! # Cache Policy Contract
//!
//! This module defines the capability contract shared by every eviction
//! engine in the crate. Callers program against [`CachePolicy`] and pick a
//! concrete engine for its eviction behavior, not its API.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌───────────────────────────────────────┐
//!                  │          CachePolicy<K, V>            │
//!                  │                                       │
//!                  │  put(&self, K, V)                     │
//!                  │  get(&self, &K) → Option<Arc<V>>      │
//!                  │  get_or_default(&self, &K) → Arc<V>   │
//!                  │  len(&self) → usize                   │
//!                  │  capacity(&self) → usize              │
//!                  │  is_empty(&self) → bool               │
//!                  └───────────────────┬───────────────────┘
//!                                      │
//!                      ┌───────────────┴───────────────┐
//!                      │                               │
//!                      ▼                               ▼
//!   ┌─────────────────────────────────┐   ┌─────────────────────────────┐
//!   │  RemovableCachePolicy<K, V>     │   │  (no arbitrary removal)     │
//!   │                                 │   │                             │
//!   │  remove(&self, &K)              │   │  LfuCache, AgingLfuCache    │
//!   │                                 │   │                             │
//!   │  LruCache, LrukCache,           │   │  Removal would leave stale  │
//!   │  ShardedLruCache                │   │  frequency bookkeeping on   │
//!   └─────────────────────────────────┘   │  the caller's hands.        │
//!                                         └─────────────────────────────┘
//! ```
//!
//! ## Engine Comparison
//!
//! | Engine            | Eviction Basis        | Extra Config              |
//! |-------------------|-----------------------|---------------------------|
//! | `LruCache`        | Least recently used   | —                         |
//! | `LrukCache`       | LRU after K touches   | `history_capacity`, `k`   |
//! | `ShardedLruCache` | LRU per shard         | `shard_count`             |
//! | `LfuCache`        | Least frequently used | —                         |
//! | `AgingLfuCache`   | LFU with freq decay   | `max_average`             |
//!
//! ## Thread Safety
//!
//! All trait methods take `&self`: every engine owns one
//! `parking_lot::Mutex` and serializes its operations internally, so a
//! `&CachePolicy` can be shared freely between threads. Operations on one
//! engine instance are equivalent to some total order consistent with
//! real-time non-overlap.
//!
//! ## Miss Signaling
//!
//! A miss is never an error. [`CachePolicy::get`] returns `None` and is the
//! correctness-bearing form. [`CachePolicy::get_or_default`] exists for
//! callers that treat the default value as "absent" anyway; it cannot
//! distinguish a miss from a legitimately stored default value, and its
//! documentation says so.

use std::sync::Arc;

/// Capability contract implemented by every eviction engine.
///
/// Values are stored and returned as `Arc<V>`, so `get` hands back a shared
/// handle without requiring `V: Clone` and without holding the engine lock
/// past the call.
///
/// # Example
///
/// ```
/// use evictkit::traits::CachePolicy;
/// use evictkit::policy::lru::LruCache;
/// use evictkit::policy::lfu::LfuCache;
///
/// fn warm<C: CachePolicy<u64, String>>(cache: &C) {
///     cache.put(1, "one".to_string());
///     cache.put(2, "two".to_string());
/// }
///
/// let lru = LruCache::new(16);
/// let lfu = LfuCache::new(16);
/// warm(&lru);
/// warm(&lfu);
/// assert_eq!(lru.get(&1).as_deref(), Some(&"one".to_string()));
/// assert_eq!(lfu.get(&2).as_deref(), Some(&"two".to_string()));
/// ```
pub trait CachePolicy<K, V> {
    /// Inserts or updates a key-value pair.
    ///
    /// A repeat key updates the value in place and counts as an access for
    /// the engine's ordering (recency touch or frequency bump). At capacity
    /// the engine evicts one victim chosen by its policy first. With
    /// capacity zero this is a no-op.
    fn put(&self, key: K, value: V);

    /// Looks up a key, counting the access.
    ///
    /// Returns `None` on miss. A hit updates the engine's ordering state
    /// (most-recently-used position or incremented frequency).
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Convenience lookup returning `V::default()` on miss.
    ///
    /// A default-valued return is ambiguous with a legitimately stored
    /// default; correctness-sensitive callers should prefer
    /// [`get`](Self::get).
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::traits::CachePolicy;
    /// use evictkit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u64, String> = LruCache::new(4);
    /// assert_eq!(*cache.get_or_default(&7), String::new());
    ///
    /// cache.put(7, "hit".to_string());
    /// assert_eq!(*cache.get_or_default(&7), "hit");
    /// ```
    fn get_or_default(&self, key: &K) -> Arc<V>
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Returns the current number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if the engine holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    ///
    /// For [`ShardedLruCache`](crate::policy::sharded_lru::ShardedLruCache)
    /// this is the sum of per-shard capacities, which may exceed the
    /// requested total due to per-shard rounding.
    fn capacity(&self) -> usize;
}

/// Engines that additionally support arbitrary key removal.
///
/// Implemented by the LRU family only. The LFU engines intentionally omit
/// removal: keys there leave by eviction or `clear`, keeping the frequency
/// bookkeeping self-contained.
///
/// # Example
///
/// ```
/// use evictkit::traits::{CachePolicy, RemovableCachePolicy};
/// use evictkit::policy::lru::LruCache;
///
/// let cache = LruCache::new(4);
/// cache.put(1u64, "v");
/// cache.remove(&1);
/// assert!(cache.get(&1).is_none());
/// ```
pub trait RemovableCachePolicy<K, V>: CachePolicy<K, V> {
    /// Removes a key if present. Removing an absent key is a no-op.
    fn remove(&self, key: &K);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal in-memory implementation exercising the trait defaults.
    struct OneSlot {
        slot: parking_lot::Mutex<Option<(u64, Arc<String>)>>,
    }

    impl CachePolicy<u64, String> for OneSlot {
        fn put(&self, key: u64, value: String) {
            *self.slot.lock() = Some((key, Arc::new(value)));
        }

        fn get(&self, key: &u64) -> Option<Arc<String>> {
            let slot = self.slot.lock();
            match slot.as_ref() {
                Some((k, v)) if k == key => Some(Arc::clone(v)),
                _ => None,
            }
        }

        fn len(&self) -> usize {
            usize::from(self.slot.lock().is_some())
        }

        fn capacity(&self) -> usize {
            1
        }
    }

    #[test]
    fn is_empty_default_follows_len() {
        let cache = OneSlot {
            slot: parking_lot::Mutex::new(None),
        };
        assert!(cache.is_empty());
        cache.put(1, "x".to_string());
        assert!(!cache.is_empty());
    }

    #[test]
    fn get_or_default_returns_default_on_miss() {
        let cache = OneSlot {
            slot: parking_lot::Mutex::new(None),
        };
        assert_eq!(*cache.get_or_default(&9), String::new());

        cache.put(9, "stored".to_string());
        assert_eq!(*cache.get_or_default(&9), "stored");
    }

    #[test]
    fn trait_is_object_safe() {
        let cache = OneSlot {
            slot: parking_lot::Mutex::new(None),
        };
        let dyn_cache: &dyn CachePolicy<u64, String> = &cache;
        dyn_cache.put(3, "obj".to_string());
        assert_eq!(dyn_cache.get(&3).as_deref(), Some(&"obj".to_string()));
    }
}
