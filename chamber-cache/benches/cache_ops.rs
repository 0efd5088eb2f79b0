use chamber_cache::{IdentityCache, StrongRefCache};
use chamber_core::{StateHandle, UniqueKey};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn email_key(id: u64) -> UniqueKey {
    UniqueKey::new("Account", "email", format!("user{}@example.org", id))
}

fn populated_cache(entries: u64, bindings: u64) -> StrongRefCache<u64, u64> {
    let mut cache = StrongRefCache::with_capacity(entries as usize);
    for id in 0..entries {
        let handle = StateHandle::new(id);
        cache.put(id, handle.clone());
        if id < bindings {
            cache.put_unique(email_key(id), handle);
        }
    }
    cache
}

fn bench_identity_map(c: &mut Criterion) {
    c.bench_function("cache/put_1k", |b| {
        b.iter(|| {
            let mut cache = StrongRefCache::with_capacity(1_000);
            for id in 0..1_000u64 {
                cache.put(black_box(id), StateHandle::new(id));
            }
            black_box(cache.len());
        });
    });

    let cache = populated_cache(1_000, 0);
    c.bench_function("cache/get_hit_1k", |b| {
        b.iter(|| {
            for id in 0..1_000u64 {
                black_box(cache.get(black_box(&id)).is_some());
            }
        });
    });

    c.bench_function("cache/get_miss", |b| {
        b.iter(|| black_box(cache.get(black_box(&1_000_001)).is_none()));
    });
}

fn bench_unique_index(c: &mut Criterion) {
    let cache = populated_cache(1_000, 256);
    c.bench_function("cache/unique_probe", |b| {
        b.iter(|| {
            // Probe keys built fresh, the way a query path builds them.
            let probe = email_key(black_box(128));
            black_box(cache.get_unique(&probe).is_some());
        });
    });

    c.bench_function("cache/contains_handle_1k_scan", |b| {
        let outsider = StateHandle::new(9_999_999u64);
        b.iter(|| black_box(cache.contains_handle(black_box(&outsider))));
    });
}

fn bench_unit_of_work_cycle(c: &mut Criterion) {
    // Full lifecycle: hydrate 256 instances, bind 64 unique keys, then
    // tear every entry down through the removal cascade.
    c.bench_function("cache/uow_cycle_256x64", |b| {
        b.iter(|| {
            let mut cache = populated_cache(256, 64);
            for id in 0..256u64 {
                black_box(cache.remove(&id).is_some());
            }
            black_box(cache.is_empty());
        });
    });
}

criterion_group!(
    benches,
    bench_identity_map,
    bench_unique_index,
    bench_unit_of_work_cycle
);
criterion_main!(benches);
