//! # Least Frequently Used (LFU) Cache Engine
//!
//! Frequency buckets over an inline node store: every resident key carries
//! an access count, same-count keys form a recency ring, and eviction takes
//! the stalest key from the lowest-count ring. All operations are O(1)
//! except a rare min-frequency rescan after draining a bucket.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LfuCore<K, V>                             │
//!   │                                                                  │
//!   │   index: FxHashMap<K, usize>      nodes: Vec<LfuNode<K, V>>      │
//!   │   ┌─────────┬───────┐             (entries + bucket sentinels,   │
//!   │   │  key_a  │ idx ──┼──►           linked by index, free-listed) │
//!   │   └─────────┴───────┘                                            │
//!   │                                                                  │
//!   │   buckets: FxHashMap<u64, usize>  (freq -> sentinel node)        │
//!   │                                                                  │
//!   │   freq=1:  s1 ◄─► [d] ◄─► [c] ◄─► s1     ← min_freq = 1          │
//!   │   freq=2:  s2 ◄─► [b] ◄─► s2                                     │
//!   │   freq=5:  s5 ◄─► [a] ◄─► s5                                     │
//!   │            MRU end        LRU end                                │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   ACCESS (get / repeat put)
//!   ═══════════════════════════════════════════════════════════════════
//!   1. index lookup
//!   2. detach node from its freq ring, freq += 1
//!   3. attach at the MRU end of the (possibly new) freq+1 ring
//!   4. if the old ring was the min ring and drained: min_freq = freq+1
//!
//!   EVICT (cache full, new key arrives)
//!   ═══════════════════════════════════════════════════════════════════
//!   1. refresh min_freq if its ring went stale
//!   2. pop the LRU end of the min ring     ← lowest count, oldest inside
//! ```
//!
//! ## Bucket Lifecycle
//!
//! Drained rings keep their sentinel and `buckets` entry; a frequency that
//! has existed once tends to recur, so sentinels are reused rather than
//! churned. Sentinels are only reclaimed wholesale by [`LfuCore::clear`]
//! and the aging rebalance.
//!
//! ## Thread Safety
//!
//! `LfuCore` is single-threaded; [`LfuCache`] wraps it in one
//! `parking_lot::Mutex` and stores values as `Arc<V>`.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::InvariantError;
use crate::traits::CachePolicy;

/// Inline node: either a resident entry (`slot` is `Some`) or a bucket
/// sentinel (`slot` is `None`). Links are indices into the owning
/// [`LfuCore::nodes`] vector.
#[derive(Debug)]
struct LfuNode<K, V> {
    prev: usize,
    next: usize,
    freq: u64,
    slot: Option<(K, V)>,
}

/// Single-threaded LFU core: frequency-bucketed rings with a min-frequency
/// cursor.
#[derive(Debug)]
pub struct LfuCore<K, V> {
    nodes: Vec<LfuNode<K, V>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: FxHashMap<u64, usize>,
    min_freq: u64,
    capacity: usize,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core with the given capacity. Capacity 0 yields a
    /// permanent no-op core.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.saturating_add(1)),
            free: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
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

    /// Access count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|&idx| self.nodes[idx].freq)
    }

    /// Looks up a key; a hit counts as an access.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.touch(key)?;
        self.peek(key)
    }

    /// Looks up a key without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.nodes[idx].slot.as_ref().map(|(_, value)| value)
    }

    /// Counts an access: bumps the key's frequency by one and moves it to
    /// the MRU end of the next ring. Returns the new frequency.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let idx = *self.index.get(key)?;
        let old = self.nodes[idx].freq;
        self.detach(idx);
        let new = old + 1;
        self.nodes[idx].freq = new;
        let sentinel = self.bucket_sentinel(new);
        self.attach_front(sentinel, idx);
        if self.min_freq == old {
            let old_sentinel = *self.buckets.get(&old).expect("bucket missing");
            if self.ring_is_empty(old_sentinel) {
                // No ring can sit between old (== min) and old + 1.
                self.min_freq = new;
            }
        }
        Some(new)
    }

    /// Inserts or updates. A repeat key is overwritten in place and the
    /// write counts as an access; the previous value is returned. At
    /// capacity the LFU victim is evicted first. New keys start at
    /// frequency 1.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            let _ = self.touch(&key);
            let slot = self.nodes[idx].slot.as_mut().expect("entry node missing");
            return Some(std::mem::replace(&mut slot.1, value));
        }
        if self.capacity == 0 {
            return None;
        }
        if self.index.len() >= self.capacity {
            self.evict_min();
        }
        let sentinel = self.bucket_sentinel(1);
        let idx = self.alloc(LfuNode {
            prev: 0,
            next: 0,
            freq: 1,
            slot: Some((key.clone(), value)),
        });
        self.attach_front(sentinel, idx);
        self.index.insert(key, idx);
        self.min_freq = 1;
        None
    }

    /// Removes and returns the LFU victim: lowest frequency, oldest within
    /// its ring.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        self.evict_min().map(|(key, value, _)| (key, value))
    }

    /// Like [`pop_lfu`](Self::pop_lfu) but also reports the victim's
    /// frequency, which the aging engine needs for its running total.
    pub(crate) fn evict_min(&mut self) -> Option<(K, V, u64)> {
        if self.index.is_empty() {
            return None;
        }
        self.refresh_min_freq();
        let sentinel = *self.buckets.get(&self.min_freq).expect("min ring missing");
        let victim = self.nodes[sentinel].prev;
        self.detach(victim);
        let freq = self.nodes[victim].freq;
        let (key, value) = self.nodes[victim].slot.take().expect("victim is a sentinel");
        self.free.push(victim);
        self.index.remove(&key);
        Some((key, value, freq))
    }

    /// Removes all entries and sentinels.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Iterates resident entries with their frequencies, in no particular
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, u64)> {
        self.nodes
            .iter()
            .filter_map(|node| node.slot.as_ref().map(|(k, v)| (k, v, node.freq)))
    }

    /// Rewrites every resident frequency to `max(1, freq - reduce_by)` and
    /// rebuilds the rings. Keys keep their relative order: lower old
    /// frequency (then staler within a ring) stays closer to eviction when
    /// rings merge. Returns the new frequency total.
    pub(crate) fn age(&mut self, reduce_by: u64) -> u64 {
        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable();

        // Gather entry nodes coldest-first: ascending ring frequency, LRU
        // end first inside each ring.
        let mut order = Vec::with_capacity(self.index.len());
        for &freq in &freqs {
            let sentinel = self.buckets[&freq];
            let mut idx = self.nodes[sentinel].prev;
            while idx != sentinel {
                order.push(idx);
                idx = self.nodes[idx].prev;
            }
            self.free.push(sentinel);
        }
        self.buckets.clear();

        let mut total = 0;
        let mut min = u64::MAX;
        for idx in order {
            let new_freq = self.nodes[idx].freq.saturating_sub(reduce_by).max(1);
            self.nodes[idx].freq = new_freq;
            let sentinel = self.bucket_sentinel(new_freq);
            self.attach_front(sentinel, idx);
            total += new_freq;
            min = min.min(new_freq);
        }
        self.min_freq = if min == u64::MAX { 0 } else { min };
        total
    }

    fn alloc(&mut self, node: LfuNode<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Returns the sentinel for `freq`, creating a self-linked one on
    /// first use.
    fn bucket_sentinel(&mut self, freq: u64) -> usize {
        if let Some(&sentinel) = self.buckets.get(&freq) {
            return sentinel;
        }
        let sentinel = self.alloc(LfuNode {
            prev: 0,
            next: 0,
            freq,
            slot: None,
        });
        self.nodes[sentinel].prev = sentinel;
        self.nodes[sentinel].next = sentinel;
        self.buckets.insert(freq, sentinel);
        sentinel
    }

    fn ring_is_empty(&self, sentinel: usize) -> bool {
        self.nodes[sentinel].next == sentinel
    }

    fn attach_front(&mut self, sentinel: usize, idx: usize) {
        let first = self.nodes[sentinel].next;
        self.nodes[idx].prev = sentinel;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[sentinel].next = idx;
    }

    fn detach(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Re-points `min_freq` at the lowest non-empty ring. Needed when the
    /// min ring drained without a bump telling us the successor.
    fn refresh_min_freq(&mut self) {
        if let Some(&sentinel) = self.buckets.get(&self.min_freq) {
            if !self.ring_is_empty(sentinel) {
                return;
            }
        }
        let min = self
            .buckets
            .iter()
            .filter(|&(_, &sentinel)| self.nodes[sentinel].next != sentinel)
            .map(|(&freq, _)| freq)
            .min();
        if let Some(min) = min {
            self.min_freq = min;
        }
    }

    /// Verifies ring integrity, index/node agreement, frequency labels,
    /// and the min-frequency lower bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen = 0usize;
        for (&freq, &sentinel) in &self.buckets {
            if self.nodes[sentinel].slot.is_some() {
                return Err(InvariantError::new("sentinel node holds an entry"));
            }
            let mut idx = self.nodes[sentinel].next;
            let mut steps = 0usize;
            while idx != sentinel {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(InvariantError::new(format!(
                        "ring for frequency {freq} does not close"
                    )));
                }
                let node = &self.nodes[idx];
                if node.slot.is_none() {
                    return Err(InvariantError::new("entry ring contains a sentinel"));
                }
                if node.freq != freq {
                    return Err(InvariantError::new(format!(
                        "node labelled freq {} sits in ring {freq}",
                        node.freq
                    )));
                }
                if self.nodes[node.next].prev != idx {
                    return Err(InvariantError::new("prev/next links disagree"));
                }
                seen += 1;
                idx = node.next;
            }
        }
        if seen != self.index.len() {
            return Err(InvariantError::new(format!(
                "rings hold {seen} entries but index holds {}",
                self.index.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new("resident count exceeds capacity"));
        }
        for (key, &idx) in &self.index {
            match &self.nodes[idx].slot {
                Some((node_key, _)) if node_key == key => {}
                Some(_) => return Err(InvariantError::new("index maps a key to a foreign node")),
                None => return Err(InvariantError::new("index maps a key to a sentinel")),
            }
        }
        if !self.index.is_empty() {
            for (_, _, freq) in self.iter() {
                if freq < self.min_freq {
                    return Err(InvariantError::new(format!(
                        "resident frequency {freq} below min_freq {}",
                        self.min_freq
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Shareable LFU engine: [`LfuCore`] behind one `parking_lot::Mutex`.
///
/// LFU has no user-facing removal: keys leave only by eviction (or
/// [`clear`](Self::clear)), so the engine implements [`CachePolicy`] but
/// not `RemovableCachePolicy`.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
///
/// let cache = LfuCache::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1); // key 1 now at frequency 2
/// cache.insert(3, "c"); // key 2 is the LFU victim
///
/// assert!(cache.get(&2).is_none());
/// assert_eq!(cache.get(&1).as_deref(), Some(&"a"));
/// ```
pub struct LfuCache<K, V> {
    inner: Mutex<LfuCore<K, Arc<V>>>,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LfuCore::new(capacity)),
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

    /// Looks up a key; a hit counts as an access.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up a key without counting an access.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key).cloned()
    }

    /// Access count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Removes and returns the LFU victim.
    pub fn pop_lfu(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lfu()
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

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        LfuCache::get(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LfuCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish()
    }
}
