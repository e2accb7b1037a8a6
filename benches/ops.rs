//! Benchmarks for the cache engines' hot paths.
//!
//! Run with: `cargo bench --bench ops`

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::prelude::*;
use rand_distr::Zipf;

use evictkit::policy::aging_lfu::AgingLfuCache;
use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru::LruCache;
use evictkit::policy::lru_k::LrukCache;
use evictkit::policy::sharded_lru::ShardedLruCache;
use evictkit::traits::CachePolicy;

const CAPACITY: usize = 1024;
const OPS: u64 = 2048;

/// Zipf-skewed key stream over a space twice the cache capacity, so every
/// engine sees both hot hits and eviction pressure.
fn key_stream() -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(42);
    let zipf = Zipf::new(2 * CAPACITY as u64, 1.1).expect("valid zipf params");
    (0..OPS).map(|_| zipf.sample(&mut rng) as u64).collect()
}

fn warmed<C: CachePolicy<u64, u64>>(cache: C) -> C {
    for key in 0..CAPACITY as u64 {
        cache.put(key, key);
    }
    cache
}

fn bench_engine<C, F>(c: &mut Criterion, name: &str, make: F)
where
    C: CachePolicy<u64, u64>,
    F: Fn() -> C,
{
    let keys = key_stream();
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("mixed_zipf", |b| {
        b.iter_batched(
            || warmed(make()),
            |cache| {
                for (i, &key) in keys.iter().enumerate() {
                    if i % 4 == 0 {
                        cache.put(std::hint::black_box(key), key);
                    } else {
                        let _ = std::hint::black_box(cache.get(&std::hint::black_box(key)));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("get_hit", |b| {
        let cache = warmed(make());
        b.iter(|| {
            for key in 0..256u64 {
                let _ = std::hint::black_box(cache.get(&std::hint::black_box(key % 64)));
            }
        })
    });

    group.bench_function("insert_churn", |b| {
        b.iter_batched(
            || warmed(make()),
            |cache| {
                for key in 0..OPS {
                    cache.put(std::hint::black_box(key + 100_000), key);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_lru(c: &mut Criterion) {
    bench_engine(c, "lru", || LruCache::new(CAPACITY));
}

fn bench_lru_k(c: &mut Criterion) {
    bench_engine(c, "lru_k", || LrukCache::new(CAPACITY));
}

fn bench_sharded_lru(c: &mut Criterion) {
    bench_engine(c, "sharded_lru", || ShardedLruCache::new(CAPACITY, 8));
}

fn bench_lfu(c: &mut Criterion) {
    bench_engine(c, "lfu", || LfuCache::new(CAPACITY));
}

fn bench_aging_lfu(c: &mut Criterion) {
    bench_engine(c, "aging_lfu", || AgingLfuCache::new(CAPACITY));
}

criterion_group!(
    benches,
    bench_lru,
    bench_lru_k,
    bench_sharded_lru,
    bench_lfu,
    bench_aging_lfu
);
criterion_main!(benches);
