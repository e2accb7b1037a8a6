//! # LRU-K Cache Engine
//!
//! Scan-resistant LRU variant: a key must be seen `k` times before it earns
//! a slot in the primary cache, so one-shot scans cannot flush the hot set.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         LrukCache<K, V>                           │
//!   │                                                                   │
//!   │   ┌─────────────────────────────────────────────────────────────┐ │
//!   │   │            parking_lot::Mutex<LrukCore<K, V>>               │ │
//!   │   └─────────────────────────────────────────────────────────────┘ │
//!   │                               │                                   │
//!   │          ┌────────────────────┴───────────────────┐              │
//!   │          ▼                                        ▼              │
//!   │   ┌──────────────────────┐    promote at    ┌──────────────────┐ │
//!   │   │  history             │    count >= k    │  primary         │ │
//!   │   │  LruCore<K, u32>     │ ───────────────► │  LruCore<K,Arc<V>>│ │
//!   │   │  key -> access count │                  │  key -> value    │ │
//!   │   └──────────────────────┘                  └──────────────────┘ │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Promotion Lifecycle
//!
//! ```text
//!   put(k, v)   key not resident, count < k   -> counted, value dropped
//!   get(k)      key not resident              -> counted, miss
//!   put(k, v)   count reaches k               -> history entry removed,
//!                                                (k, v) enters primary
//!   get(k)      key resident                  -> hit, primary recency touch
//! ```
//!
//! Only the promoting `put` carries a value into the primary cache; the
//! history side tracks access counts alone. Both sides are plain LRU, so a
//! key evicted from history loses its accumulated count and starts over.
//!
//! ## Why k = 2 by Default
//!
//! One repeat access is enough to separate "touched once by a scan" from
//! "actually reused", at minimal bookkeeping cost. Larger `k` hardens the
//! filter further at the price of slower warm-up.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::InvariantError;
use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, RemovableCachePolicy};

/// Default promotion threshold.
pub const DEFAULT_K: u32 = 2;

/// Single-threaded LRU-K core: an access-count history LRU gating a
/// primary value LRU.
#[derive(Debug)]
pub struct LrukCore<K, V> {
    primary: LruCore<K, Arc<V>>,
    history: LruCore<K, u32>,
    k: u32,
}

impl<K, V> LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core with `k = 2` and a history sized like the primary.
    pub fn new(capacity: usize) -> Self {
        Self::with_params(capacity, capacity, DEFAULT_K)
    }

    /// Creates a core with explicit history capacity and promotion
    /// threshold. `k` is clamped to at least 1.
    pub fn with_params(capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self {
            primary: LruCore::new(capacity),
            history: LruCore::new(history_capacity),
            k: k.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.primary.capacity()
    }

    /// Number of promoted (value-holding) entries. Keys still accumulating
    /// history accesses are not counted.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// True if the key has been promoted into the primary cache.
    pub fn contains(&self, key: &K) -> bool {
        self.primary.contains(key)
    }

    /// Number of keys currently accumulating accesses in the history side.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Looks up a promoted key. A miss still counts as an access toward
    /// the key's promotion threshold.
    pub fn get(&mut self, key: &K) -> Option<Arc<V>> {
        if let Some(value) = self.primary.get(key) {
            return Some(Arc::clone(value));
        }
        self.record_access(key);
        None
    }

    /// Inserts or updates.
    ///
    /// A promoted key is overwritten in place. An unpromoted key has its
    /// access count bumped; if the count reaches `k`, the key leaves
    /// history and enters the primary cache with *this* call's value.
    /// Below the threshold the value is dropped.
    pub fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        if self.primary.contains(&key) {
            return self.primary.insert(key, value);
        }
        let count = self.record_access(&key);
        if count >= self.k {
            self.history.remove(&key);
            self.primary.insert(key, value)
        } else {
            None
        }
    }

    /// Removes a key from both sides, returning the promoted value if any.
    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.history.remove(key);
        self.primary.remove(key)
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.history.clear();
    }

    fn record_access(&mut self, key: &K) -> u32 {
        if let Some(count) = self.history.get_mut(key) {
            *count = count.saturating_add(1);
            return *count;
        }
        // New tracked key. With a zero-capacity history this insert is a
        // no-op and the count never accumulates, so nothing ever promotes.
        self.history.insert(key.clone(), 1);
        1
    }

    /// Verifies both sides structurally and that no key is tracked on both.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.primary.check_invariants()?;
        self.history.check_invariants()?;
        for (key, count) in self.history.iter() {
            if self.primary.contains(key) {
                return Err(InvariantError::new(
                    "key present in both history and primary",
                ));
            }
            // Counts can sit at or above k: a get miss that reaches the
            // threshold waits for the next put to carry a value in.
            if *count == 0 {
                return Err(InvariantError::new("history holds a zero access count"));
            }
        }
        Ok(())
    }
}

/// Shareable LRU-K engine: [`LrukCore`] behind one `parking_lot::Mutex`.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LrukCache;
///
/// let cache = LrukCache::new(8); // k = 2
/// cache.insert(1, "first");      // access 1 of 2: not yet resident
/// assert!(cache.get(&1).is_none());
///
/// cache.insert(1, "second");     // threshold reached: promoted
/// assert_eq!(cache.get(&1).as_deref(), Some(&"second"));
/// ```
pub struct LrukCache<K, V> {
    inner: Mutex<LrukCore<K, V>>,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with `k = 2` and a history sized like the primary.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LrukCore::new(capacity)),
        }
    }

    /// Creates an engine with explicit history capacity and promotion
    /// threshold.
    pub fn with_params(capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self {
            inner: Mutex::new(LrukCore::with_params(capacity, history_capacity, k)),
        }
    }

    /// Inserts a value, wrapping it in `Arc`. See [`LrukCore::insert`] for
    /// the promotion rules.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped `Arc<V>`.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up a promoted key; a miss counts toward promotion.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key)
    }

    /// Removes a key from both history and primary.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
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

    pub fn history_len(&self) -> usize {
        self.inner.lock().history_len()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs the core's structural self-check under the engine lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> CachePolicy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LrukCache::get(self, key)
    }

    fn len(&self) -> usize {
        LrukCache::len(self)
    }

    fn capacity(&self) -> usize {
        LrukCache::capacity(self)
    }
}

impl<K, V> RemovableCachePolicy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&self, key: &K) {
        LrukCache::remove(self, key);
    }
}

impl<K, V> fmt::Debug for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LrukCache")
            .field("len", &core.len())
            .field("history_len", &core.history_len())
            .field("capacity", &core.capacity())
            .finish()
    }
}
