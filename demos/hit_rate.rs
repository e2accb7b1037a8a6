//! Hit-rate comparison across all five engines under a hot/cold workload.
//!
//! Run with: `cargo run --example hit_rate --release`
//!
//! The workload mixes a tiny hot set with a large cold key space: 70% of
//! operations target one of 3 hot keys, the rest spread over 5000 cold
//! keys. A write phase seeds the caches, then a read phase measures hits.

use rand::prelude::*;

use evictkit::prelude::*;

const OPERATIONS: usize = 100_000;
const HOT_KEYS: u64 = 3;
const COLD_KEYS: u64 = 5_000;
const HOT_RATIO_PERCENT: u64 = 70;
const CAPACITY: usize = 50;

fn pick_key(rng: &mut StdRng) -> u64 {
    if rng.gen_range(0..100) < HOT_RATIO_PERCENT {
        rng.gen_range(0..HOT_KEYS)
    } else {
        HOT_KEYS + rng.gen_range(0..COLD_KEYS)
    }
}

fn measure(name: &str, cache: &dyn CachePolicy<u64, String>) {
    let mut rng = StdRng::seed_from_u64(7);

    // Write phase: 40% of operations populate the cache.
    for _ in 0..OPERATIONS * 2 / 5 {
        let key = pick_key(&mut rng);
        cache.put(key, format!("value-{key}"));
    }

    // Read phase: the remaining 60% measure the hit ratio.
    let mut hits = 0usize;
    let mut gets = 0usize;
    for _ in 0..OPERATIONS * 3 / 5 {
        let key = pick_key(&mut rng);
        gets += 1;
        if cache.get(&key).is_some() {
            hits += 1;
        }
    }

    let ratio = 100.0 * hits as f64 / gets as f64;
    println!("{name:>12}: {hits:>6} / {gets} hits ({ratio:.2}%)");
}

fn main() {
    println!(
        "workload: {OPERATIONS} ops, {HOT_KEYS} hot / {COLD_KEYS} cold keys, \
         {HOT_RATIO_PERCENT}% hot, capacity {CAPACITY}"
    );

    measure("lru", &LruCache::new(CAPACITY));
    measure("lru_k", &LrukCache::new(CAPACITY));
    measure("sharded_lru", &ShardedLruCache::new(CAPACITY, 4));
    measure("lfu", &LfuCache::new(CAPACITY));
    measure("aging_lfu", &AgingLfuCache::with_max_average(CAPACITY, 10));
}
