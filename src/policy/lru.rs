//! # Least Recently Used (LRU) Cache Engine
//!
//! Sentinel-anchored recency list plus a key index, giving O(1) get, put,
//! remove, and eviction.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                           │
//!   │                                                                  │
//!   │   ┌────────────────────────────────────────────────────────────┐ │
//!   │   │            parking_lot::Mutex<LruCore<K, Arc<V>>>          │ │
//!   │   └────────────────────────────────────────────────────────────┘ │
//!   │                               │                                  │
//!   │                               ▼                                  │
//!   │   ┌────────────────────────────────────────────────────────────┐ │
//!   │   │                      LruCore<K, V>                         │ │
//!   │   │                                                            │ │
//!   │   │   FxHashMap<K, SlotId>          SentinelList<LruEntry>     │ │
//!   │   │   ┌─────────┬────────┐                                     │ │
//!   │   │   │  key_1  │ id_1 ──┼──► sentinel ◄─► [id_1] ◄─► [id_2]   │ │
//!   │   │   │  key_2  │ id_2 ──┼──►              (MRU)       (LRU)   │ │
//!   │   │   └─────────┴────────┘                                     │ │
//!   │   └────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   INSERT new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════
//!   Before:  sentinel ◄─► [A] ◄─► [B] ◄─► [C] ◄─► sentinel
//!   put(D):  1. evict [C] (node before the sentinel)
//!            2. push [D] right after the sentinel
//!   After:   sentinel ◄─► [D] ◄─► [A] ◄─► [B] ◄─► sentinel
//!
//!   ACCESS existing key
//!   ═══════════════════════════════════════════════════════════════════
//!   get(B):  1. index lookup: O(1)
//!            2. four-link splice moves [B] after the sentinel: O(1)
//! ```
//!
//! ## Key Components
//!
//! | Component        | Description                                       |
//! |------------------|---------------------------------------------------|
//! | `LruCore<K, V>`  | Single-threaded core: index + sentinel list       |
//! | `LruCache<K, V>` | Engine: one `Mutex` per instance, `Arc<V>` values |
//! | `LruEntry<K, V>` | List node payload: key (for eviction) + value     |
//!
//! ## Thread Safety
//!
//! - `LruCore` is **not** thread-safe; it is the building block the
//!   composite engines (`LrukCache`, `ShardedLruCache`) reuse under their
//!   own locks.
//! - `LruCache` serializes every operation behind one mutex held for the
//!   whole call, so concurrent callers observe some total order consistent
//!   with real-time non-overlap.
//!
//! ## Degenerate Capacities
//!
//! - Capacity 0: every `get` misses and every `put` is a no-op, permanently.
//! - Capacity 1: always-overwrite; the single resident is replaced whenever
//!   a different key is inserted.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::sentinel_list::SentinelList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
use crate::traits::{CachePolicy, RemovableCachePolicy};

#[derive(Debug)]
struct LruEntry<K, V> {
    key: K,
    value: V,
}

/// Single-threaded LRU core: key index plus sentinel-anchored recency list.
///
/// The composite engines embed this type directly; callers wanting a
/// shareable engine use [`LruCache`].
#[derive(Debug)]
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    list: SentinelList<LruEntry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core with the given capacity. Capacity 0 yields a
    /// permanent no-op core.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: SentinelList::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up a key and marks it most-recently-used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Like [`get`](Self::get) but yields a mutable reference.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Looks up a key without disturbing recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Inserts or updates. A repeat key is touched and overwritten in
    /// place; the previous value is returned. At capacity the
    /// least-recently-used entry is evicted first.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            let entry = self.list.get_mut(id).expect("lru entry missing");
            return Some(std::mem::replace(&mut entry.value, value));
        }
        if self.capacity == 0 {
            return None;
        }
        if self.index.len() >= self.capacity {
            self.pop_lru();
        }
        let id = self.list.push_front(LruEntry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the least-recently-used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (_, entry) = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Peeks at the least-recently-used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Marks a key most-recently-used without retrieving the value.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Iterates entries from most- to least-recently-used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Verifies index/list bijection, capacity bound, and link integrity.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but list holds {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new("resident count exceeds capacity"));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {}
                Some(_) => return Err(InvariantError::new("index maps a key to a foreign node")),
                None => return Err(InvariantError::new("index maps a key to a freed node")),
            }
        }
        Ok(())
    }
}

/// Shareable LRU engine: [`LruCore`] behind one `parking_lot::Mutex`.
///
/// Values are wrapped in `Arc` on insert so `get` can hand out shared
/// handles without cloning `V`.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCache;
///
/// let cache = LruCache::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.insert(3, "c"); // evicts key 1
///
/// assert!(cache.get(&1).is_none());
/// assert_eq!(cache.get(&2).as_deref(), Some(&"b"));
/// assert_eq!(cache.get(&3).as_deref(), Some(&"c"));
/// ```
pub struct LruCache<K, V> {
    inner: Mutex<LruCore<K, Arc<V>>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCore::new(capacity)),
        }
    }

    /// Inserts a value, wrapping it in `Arc`. Returns the previous value
    /// for a repeat key.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped `Arc<V>`.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up a key, marking it most-recently-used.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up a key without disturbing recency order.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key).cloned()
    }

    /// Removes a key, returning its value.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Marks a key most-recently-used without retrieving the value.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Removes and returns the least-recently-used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lru()
    }

    /// Peeks at the least-recently-used entry.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.lock();
        core.peek_lru().map(|(k, v)| (k.clone(), Arc::clone(v)))
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

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs the core's structural self-check under the engine lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LruCache::get(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }
}

impl<K, V> RemovableCachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&self, key: &K) {
        LruCache::remove(self, key);
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- LruCore ----------------------------------------------------------

    #[test]
    fn core_insert_and_get() {
        let mut core = LruCore::new(4);
        assert_eq!(core.insert(1, "a"), None);
        assert_eq!(core.get(&1), Some(&"a"));
        assert_eq!(core.get(&2), None);
        core.check_invariants().unwrap();
    }

    #[test]
    fn core_eviction_scenario_capacity_two() {
        // put(1,a), put(2,b), put(3,c): key 1 is the LRU victim.
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.insert(2, "b");
        core.insert(3, "c");

        assert_eq!(core.get(&1), None);
        assert_eq!(core.get(&2), Some(&"b"));
        assert_eq!(core.get(&3), Some(&"c"));
        core.check_invariants().unwrap();
    }

    #[test]
    fn core_get_refreshes_recency() {
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.insert(2, "b");
        core.get(&1); // key 2 becomes LRU
        core.insert(3, "c");

        assert_eq!(core.get(&2), None);
        assert_eq!(core.get(&1), Some(&"a"));
        assert_eq!(core.get(&3), Some(&"c"));
    }

    #[test]
    fn core_resident_set_is_most_recently_touched() {
        let mut core = LruCore::new(3);
        for key in 0..10 {
            core.insert(key, key * 10);
        }
        // Touch order is 7, 8, 9; those must be the residents.
        assert_eq!(core.len(), 3);
        for key in 0..7 {
            assert!(!core.contains(&key));
        }
        for key in 7..10 {
            assert_eq!(core.peek(&key), Some(&(key * 10)));
        }
        core.check_invariants().unwrap();
    }

    #[test]
    fn core_update_touches_and_overwrites() {
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.insert(2, "b");
        assert_eq!(core.insert(1, "a2"), Some("a")); // 2 is now LRU
        core.insert(3, "c");

        assert_eq!(core.get(&2), None);
        assert_eq!(core.get(&1), Some(&"a2"));
        assert_eq!(core.len(), 2);
    }

    #[test]
    fn core_capacity_one_always_overwrites() {
        let mut core = LruCore::new(1);
        core.insert(1, "a");
        core.insert(2, "b");
        assert_eq!(core.get(&1), None);
        assert_eq!(core.get(&2), Some(&"b"));
        assert_eq!(core.len(), 1);
    }

    #[test]
    fn core_capacity_zero_is_permanent_noop() {
        let mut core = LruCore::new(0);
        assert_eq!(core.insert(1, "a"), None);
        assert_eq!(core.get(&1), None);
        assert_eq!(core.len(), 0);
        core.check_invariants().unwrap();
    }

    #[test]
    fn core_remove_unlinks_and_deindexes() {
        let mut core = LruCore::new(3);
        core.insert(1, "a");
        core.insert(2, "b");
        assert_eq!(core.remove(&1), Some("a"));
        assert_eq!(core.remove(&1), None);
        assert_eq!(core.len(), 1);
        core.check_invariants().unwrap();
    }

    #[test]
    fn core_pop_and_peek_lru() {
        let mut core = LruCore::new(3);
        core.insert(1, "a");
        core.insert(2, "b");
        core.insert(3, "c");
        core.touch(&1);

        assert_eq!(core.peek_lru(), Some((&2, &"b")));
        assert_eq!(core.pop_lru(), Some((2, "b")));
        assert_eq!(core.pop_lru(), Some((3, "c")));
        assert_eq!(core.pop_lru(), Some((1, "a")));
        assert_eq!(core.pop_lru(), None);
    }

    #[test]
    fn core_peek_does_not_touch() {
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.insert(2, "b");
        core.peek(&1); // no recency change; 1 stays LRU
        core.insert(3, "c");
        assert_eq!(core.get(&1), None);
        assert_eq!(core.get(&2), Some(&"b"));
    }

    #[test]
    fn core_put_then_get_is_idempotent() {
        let mut core = LruCore::new(8);
        for key in 0u64..32 {
            core.insert(key % 8, key);
            assert_eq!(core.get(&(key % 8)), Some(&key));
        }
        core.check_invariants().unwrap();
    }

    // -- LruCache (engine) ------------------------------------------------

    #[test]
    fn engine_basic_ops() {
        let cache = LruCache::new(2);
        cache.insert(1, "a");
        assert_eq!(cache.get(&1).as_deref(), Some(&"a"));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&1));

        cache.remove(&1);
        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn engine_insert_arc_shares_value() {
        let cache = LruCache::new(2);
        let shared = Arc::new(vec![1u8, 2, 3]);
        cache.insert_arc(1, Arc::clone(&shared));
        let got = cache.get(&1).unwrap();
        assert!(Arc::ptr_eq(&got, &shared));
    }

    #[test]
    fn engine_trait_surface() {
        use crate::traits::{CachePolicy, RemovableCachePolicy};

        let cache: LruCache<u64, String> = LruCache::new(2);
        cache.put(1, "one".to_string());
        assert_eq!(CachePolicy::get(&cache, &1).as_deref(), Some(&"one".to_string()));
        assert_eq!(*cache.get_or_default(&99), String::new());

        RemovableCachePolicy::remove(&cache, &1);
        assert!(CachePolicy::get(&cache, &1).is_none());
    }

    #[test]
    fn engine_clear_resets() {
        let cache = LruCache::new(4);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);
        cache.check_invariants().unwrap();
    }
}
