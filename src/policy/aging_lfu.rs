//! # Aging LFU Cache Engine
//!
//! Plain LFU lets a key that was hot last week hold its slot forever on a
//! stale count. This engine tracks the total access count across residents
//! and, when the average exceeds a ceiling, subtracts a fixed amount from
//! every key's count so stale frequency capital decays.
//!
//! ## Rebalance Rule
//!
//! ```text
//!   after every counted access:
//!     if len > 0 and total_freq / len > max_average:
//!         every freq -= max_average / 2      (floored at 1)
//!         total_freq  = new sum
//! ```
//!
//! Integer division throughout: the trigger uses the floored average, and
//! one rebalance may leave the average above the ceiling if counts are far
//! beyond it; each subsequent access shaves it further.
//!
//! ## What Aging Preserves
//!
//! - Frequencies never drop below 1.
//! - Relative eviction order is preserved: rings merge at the floor, but a
//!   colder key never leapfrogs a hotter one.
//! - `total_freq` stays equal to the sum of resident frequencies; evicted
//!   keys take their count out of the total.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConfigError, InvariantError};
use crate::policy::lfu::LfuCore;
use crate::traits::CachePolicy;

/// Default ceiling on the average resident frequency.
pub const DEFAULT_MAX_AVERAGE: u64 = 20;

/// Single-threaded aging LFU core: an [`LfuCore`] plus a running frequency
/// total and the rebalance trigger.
#[derive(Debug)]
pub struct AgingLfuCore<K, V> {
    core: LfuCore<K, V>,
    total_freq: u64,
    max_average: u64,
}

impl<K, V> AgingLfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core with the default average ceiling.
    pub fn new(capacity: usize) -> Self {
        Self::with_max_average(capacity, DEFAULT_MAX_AVERAGE)
    }

    /// Creates a core with an explicit average ceiling, clamped to at
    /// least 1.
    pub fn with_max_average(capacity: usize, max_average: u64) -> Self {
        Self {
            core: LfuCore::new(capacity),
            total_freq: 0,
            max_average: max_average.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.core.contains(key)
    }

    pub fn max_average(&self) -> u64 {
        self.max_average
    }

    /// Sum of all resident access counts.
    pub fn total_frequency(&self) -> u64 {
        self.total_freq
    }

    /// Access count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.core.frequency(key)
    }

    /// Looks up a key; a hit counts as an access and may trigger a
    /// rebalance.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.core.touch(key)?;
        self.total_freq += 1;
        self.maybe_rebalance();
        self.core.peek(key)
    }

    /// Looks up a key without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.core.peek(key)
    }

    /// Inserts or updates; both count as an access. Evicting a key at
    /// capacity removes its frequency from the running total.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.core.contains(&key) {
            let previous = self.core.insert(key, value);
            self.total_freq += 1;
            self.maybe_rebalance();
            return previous;
        }
        if self.core.capacity() == 0 {
            return None;
        }
        if self.core.len() >= self.core.capacity() {
            if let Some((_, _, freq)) = self.core.evict_min() {
                self.total_freq -= freq;
            }
        }
        self.core.insert(key, value);
        self.total_freq += 1;
        self.maybe_rebalance();
        None
    }

    pub fn clear(&mut self) {
        self.core.clear();
        self.total_freq = 0;
    }

    fn maybe_rebalance(&mut self) {
        let len = self.core.len() as u64;
        if len == 0 {
            return;
        }
        if self.total_freq / len > self.max_average {
            // Halving the ceiling keeps hot keys ahead while draining
            // stale counts in a few passes.
            let reduce_by = (self.max_average / 2).max(1);
            self.total_freq = self.core.age(reduce_by);
        }
    }

    /// Verifies the inner LFU structure and that the running total matches
    /// the sum of resident frequencies.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.core.check_invariants()?;
        let sum: u64 = self.core.iter().map(|(_, _, freq)| freq).sum();
        if sum != self.total_freq {
            return Err(InvariantError::new(format!(
                "running total {} but resident frequencies sum to {sum}",
                self.total_freq
            )));
        }
        Ok(())
    }
}

/// Shareable aging LFU engine: [`AgingLfuCore`] behind one
/// `parking_lot::Mutex`.
///
/// # Example
///
/// ```
/// use evictkit::policy::aging_lfu::AgingLfuCache;
///
/// let cache = AgingLfuCache::with_max_average(64, 10);
/// cache.insert("hot", 1);
/// for _ in 0..100 {
///     cache.get(&"hot"); // count decays instead of growing unbounded
/// }
/// assert!(cache.frequency(&"hot").unwrap() < 100);
/// ```
pub struct AgingLfuCache<K, V> {
    inner: Mutex<AgingLfuCore<K, Arc<V>>>,
}

impl<K, V> AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with the default average ceiling.
    pub fn new(capacity: usize) -> Self {
        Self::with_max_average(capacity, DEFAULT_MAX_AVERAGE)
    }

    /// Creates an engine with an explicit average ceiling, clamped to at
    /// least 1.
    pub fn with_max_average(capacity: usize, max_average: u64) -> Self {
        Self {
            inner: Mutex::new(AgingLfuCore::with_max_average(capacity, max_average)),
        }
    }

    /// Like [`with_max_average`](Self::with_max_average) but rejects a
    /// zero ceiling instead of clamping it.
    pub fn try_with_max_average(capacity: usize, max_average: u64) -> Result<Self, ConfigError> {
        if max_average == 0 {
            return Err(ConfigError::new("max average frequency must be at least 1"));
        }
        Ok(Self::with_max_average(capacity, max_average))
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

    /// Looks up a key; a hit counts as an access and may trigger a
    /// rebalance.
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

    /// Sum of all resident access counts.
    pub fn total_frequency(&self) -> u64 {
        self.inner.lock().total_frequency()
    }

    pub fn max_average(&self) -> u64 {
        self.inner.lock().max_average()
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

impl<K, V> CachePolicy<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &K) -> Option<Arc<V>> {
        AgingLfuCache::get(self, key)
    }

    fn len(&self) -> usize {
        AgingLfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        AgingLfuCache::capacity(self)
    }
}

impl<K, V> fmt::Debug for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("AgingLfuCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .field("total_frequency", &core.total_frequency())
            .field("max_average", &core.max_average())
            .finish()
    }
}
