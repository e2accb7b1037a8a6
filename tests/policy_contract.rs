// ==============================================
// CACHE POLICY CONTRACT TESTS (integration)
// ==============================================
//
// Behaviors every engine must share regardless of eviction policy,
// exercised through the `CachePolicy` trait surface.

use std::sync::Arc;

use evictkit::prelude::*;

fn engines(capacity: usize) -> Vec<(&'static str, Box<dyn CachePolicy<u64, u64>>)> {
    vec![
        ("lru", Box::new(LruCache::new(capacity))),
        ("lru_k", Box::new(LrukCache::with_params(capacity, capacity, 1))),
        ("sharded_lru", Box::new(ShardedLruCache::new(capacity, 4))),
        ("lfu", Box::new(LfuCache::new(capacity))),
        ("aging_lfu", Box::new(AgingLfuCache::new(capacity))),
    ]
}

#[test]
fn put_then_get_returns_the_value() {
    // k = 1 for the LRU-K engine so a single put is resident everywhere.
    for (name, cache) in engines(64) {
        for key in 0..32 {
            cache.put(key, key * 2);
            assert_eq!(
                cache.get(&key).as_deref(),
                Some(&(key * 2)),
                "{name}: fresh put must be readable"
            );
        }
    }
}

#[test]
fn miss_is_none_not_an_error() {
    for (name, cache) in engines(16) {
        assert!(cache.get(&12345).is_none(), "{name}: cold key must miss");
        assert_eq!(cache.len(), 0, "{name}: a miss must not create an entry");
    }
}

#[test]
fn get_or_default_fills_misses() {
    for (name, cache) in engines(16) {
        cache.put(7, 70);
        assert_eq!(*cache.get_or_default(&7), 70, "{name}");
        assert_eq!(*cache.get_or_default(&8), 0, "{name}: miss yields default");
    }
}

#[test]
fn len_never_exceeds_capacity() {
    for (name, cache) in engines(32) {
        for key in 0..500 {
            cache.put(key, key);
            assert!(
                cache.len() <= cache.capacity(),
                "{name}: len {} over capacity {}",
                cache.len(),
                cache.capacity()
            );
        }
    }
}

#[test]
fn capacity_zero_engines_are_permanent_noops() {
    for (name, cache) in engines(0) {
        for key in 0..10 {
            cache.put(key, key);
        }
        assert_eq!(cache.len(), 0, "{name}");
        assert!(cache.is_empty(), "{name}");
        for key in 0..10 {
            assert!(cache.get(&key).is_none(), "{name}: nothing may stick");
        }
    }
}

#[test]
fn repeat_put_overwrites_without_growing() {
    for (name, cache) in engines(16) {
        cache.put(1, 100);
        cache.put(1, 200);
        cache.put(1, 300);
        assert_eq!(cache.len(), 1, "{name}");
        assert_eq!(cache.get(&1).as_deref(), Some(&300), "{name}");
    }
}

#[test]
fn engines_work_behind_trait_objects() {
    // Dynamic dispatch across heterogeneous policies sharing one slot.
    let caches: Vec<Arc<dyn CachePolicy<String, Vec<u8>>>> = vec![
        Arc::new(LruCache::new(8)),
        Arc::new(LfuCache::new(8)),
    ];
    for cache in &caches {
        cache.put("blob".to_string(), vec![1, 2, 3]);
        let value = cache.get(&"blob".to_string()).unwrap();
        assert_eq!(*value, vec![1, 2, 3]);
    }
}

#[test]
fn lru_keeps_the_most_recently_touched_set() {
    let cache = LruCache::new(4);
    for key in 0..16u64 {
        cache.insert(key, key);
    }
    // Exactly the last four inserts survive.
    assert_eq!(cache.len(), 4);
    for key in 0..12 {
        assert!(cache.get(&key).is_none());
    }
    for key in 12..16 {
        assert_eq!(cache.get(&key).as_deref(), Some(&key));
    }
    cache.check_invariants().unwrap();
}

#[test]
fn removable_engines_forget_removed_keys() {
    let removable: Vec<(&str, Box<dyn RemovableCachePolicy<u64, u64>>)> = vec![
        ("lru", Box::new(LruCache::new(16))),
        ("lru_k", Box::new(LrukCache::with_params(16, 16, 1))),
        ("sharded_lru", Box::new(ShardedLruCache::new(16, 4))),
    ];
    for (name, cache) in removable {
        cache.put(1, 10);
        assert!(cache.get(&1).is_some(), "{name}");
        cache.remove(&1);
        assert!(cache.get(&1).is_none(), "{name}: removed key must miss");
    }
}

#[test]
fn structural_invariants_hold_after_mixed_workload() {
    let lru = LruCache::new(32);
    let lruk = LrukCache::new(32);
    let sharded = ShardedLruCache::new(32, 4);
    let lfu = LfuCache::new(32);
    let aging = AgingLfuCache::with_max_average(32, 5);

    for i in 0u64..2_000 {
        let key = i % 100;
        if i % 3 == 0 {
            lru.insert(key, i);
            lruk.insert(key, i);
            sharded.insert(key, i);
            lfu.insert(key, i);
            aging.insert(key, i);
        } else {
            lru.get(&key);
            lruk.get(&key);
            sharded.get(&key);
            lfu.get(&key);
            aging.get(&key);
        }
        if i % 17 == 0 {
            lru.remove(&key);
            sharded.remove(&key);
        }
    }

    lru.check_invariants().unwrap();
    lruk.check_invariants().unwrap();
    sharded.check_invariants().unwrap();
    lfu.check_invariants().unwrap();
    aging.check_invariants().unwrap();
}
