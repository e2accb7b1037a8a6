//! # Sharded LRU Cache Engine
//!
//! Splits one logical LRU into N independent [`LruCore`] shards, each behind
//! its own mutex, so operations on keys in different shards never contend.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                     ShardedLruCache<K, V>                      │
//!   │                                                                │
//!   │   key ──► ShardSelector (seeded hash, deterministic)           │
//!   │                  │                                             │
//!   │        ┌─────────┼─────────────┬──────────────┐                │
//!   │        ▼         ▼             ▼              ▼                │
//!   │   ┌─────────┐ ┌─────────┐ ┌─────────┐   ┌─────────┐           │
//!   │   │ Mutex   │ │ Mutex   │ │ Mutex   │   │ Mutex   │           │
//!   │   │ LruCore │ │ LruCore │ │ LruCore │ … │ LruCore │           │
//!   │   │ shard 0 │ │ shard 1 │ │ shard 2 │   │ shard N │           │
//!   │   └─────────┘ └─────────┘ └─────────┘   └─────────┘           │
//!   └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Semantics vs. a Single LRU
//!
//! Recency is tracked **per shard**: each shard evicts its own LRU victim,
//! not the globally least-recently-used entry. Capacity is likewise divided
//! up front (`ceil(capacity / shards)` per shard), so a skewed key
//! distribution can evict from a hot shard while cold shards sit
//! half-empty. That trade is the point: near-linear scaling of throughput
//! with shard count under multi-threaded load.
//!
//! Aggregate reads (`len`, `check_invariants`) lock shards one at a time
//! and are only approximate under concurrent writes.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ds::shard::ShardSelector;
use crate::error::{ConfigError, InvariantError};
use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, RemovableCachePolicy};

/// Sharded LRU engine: N mutex-guarded [`LruCore`] shards addressed by a
/// deterministic key hash.
///
/// # Example
///
/// ```
/// use evictkit::policy::sharded_lru::ShardedLruCache;
///
/// let cache = ShardedLruCache::new(100, 4); // 25 slots per shard
/// cache.insert("user:1", 42);
/// assert_eq!(cache.get(&"user:1").as_deref(), Some(&42));
/// assert_eq!(cache.shard_count(), 4);
/// ```
pub struct ShardedLruCache<K, V> {
    shards: Vec<Mutex<LruCore<K, Arc<V>>>>,
    selector: ShardSelector,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with `capacity` total slots across `shard_count`
    /// shards. A zero shard count is clamped to 1; per-shard capacity is
    /// `ceil(capacity / shard_count)`.
    pub fn new(capacity: usize, shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let per_shard = capacity.div_ceil(shard_count);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(LruCore::new(per_shard)))
            .collect();
        Self {
            shards,
            selector: ShardSelector::new(shard_count, 0),
        }
    }

    /// Like [`new`](Self::new) but rejects a zero shard count instead of
    /// clamping it.
    pub fn try_with_shards(capacity: usize, shard_count: usize) -> Result<Self, ConfigError> {
        if shard_count == 0 {
            return Err(ConfigError::new("shard count must be at least 1"));
        }
        Ok(Self::new(capacity, shard_count))
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard index the given key routes to. Stable for the lifetime of the
    /// engine.
    pub fn shard_index(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    fn shard(&self, key: &K) -> &Mutex<LruCore<K, Arc<V>>> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Inserts a value, wrapping it in `Arc`. Returns the previous value
    /// for a repeat key.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped `Arc<V>` into the key's shard.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.shard(&key).lock().insert(key, value)
    }

    /// Looks up a key, marking it most-recently-used within its shard.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).lock().get(key).cloned()
    }

    /// Looks up a key without disturbing its shard's recency order.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).lock().peek(key).cloned()
    }

    /// Removes a key from its shard.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).lock().remove(key)
    }

    /// Marks a key most-recently-used within its shard.
    pub fn touch(&self, key: &K) -> bool {
        self.shard(key).lock().touch(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).lock().contains(key)
    }

    /// Total resident entries, summed shard by shard.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Total capacity: per-shard capacity times shard count. Due to the
    /// ceiling split this can slightly exceed the requested capacity.
    pub fn capacity(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().capacity())
            .sum()
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }

    /// Runs every shard's structural self-check and verifies each resident
    /// key actually routes to the shard holding it.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (idx, shard) in self.shards.iter().enumerate() {
            let core = shard.lock();
            core.check_invariants()?;
            for (key, _) in core.iter() {
                let routed = self.selector.shard_for_key(key);
                if routed != idx {
                    return Err(InvariantError::new(format!(
                        "key resident in shard {idx} but routes to shard {routed}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<K, V> CachePolicy<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        ShardedLruCache::get(self, key)
    }

    fn len(&self) -> usize {
        ShardedLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        ShardedLruCache::capacity(self)
    }
}

impl<K, V> RemovableCachePolicy<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&self, key: &K) {
        ShardedLruCache::remove(self, key);
    }
}

impl<K, V> fmt::Debug for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedLruCache")
            .field("shards", &self.shards.len())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
