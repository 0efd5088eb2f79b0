//! Fuzz test for CHAMBER unique key deserialization
//!
//! This fuzz target feeds arbitrary byte sequences into the serde path to find:
//! - Panics or crashes
//! - Keys that slip past the non-empty member rule
//! - Round-trip corruption
//!
//! Run with: cargo +nightly fuzz run key_deserialize_fuzz -- -max_total_time=60

#![no_main]

use chamber_core::UniqueKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to interpret the bytes as UTF-8
    // The deserializer should reject or accept any valid UTF-8 string without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(key) = serde_json::from_str::<UniqueKey>(input) {
            // Basic invariants that should always hold for accepted keys:
            // 1. Deserialization routes through the same validation as the constructors
            assert!(key.member_count() >= 1, "Accepted key should have at least one member");

            // 2. Composite classification agrees with the member count
            assert_eq!(
                key.is_composite(),
                key.member_count() > 1,
                "Composite flag should track the member count"
            );

            // 3. An accepted key should survive a serialize round trip unchanged
            let json = serde_json::to_string(&key).expect("valid key should serialize");
            let back: UniqueKey = serde_json::from_str(&json).expect("round trip should parse");
            assert_eq!(key, back, "Round trip should preserve the key");

            // 4. Display should never panic on accepted keys
            let _ = key.to_string();
        }
    }
});
