//! CHAMBER Test Utilities
//!
//! Centralized test infrastructure for the CHAMBER workspace:
//! - Proptest generators for keys, values, and handles
//! - Drop-instrumented state for retention testing
//! - Test fixtures for common caching scenarios
//! - Custom assertions for handle identity and cache results

// Re-export core types for convenience
pub use chamber_core::{
    ChamberError, ChamberResult, IntegrityError, KeyError, KeyValue, StateHandle, UniqueKey,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// TRACKED STATE
// ============================================================================

/// Counts live [`TrackedState`] instances sharing this counter.
///
/// Clones observe the same count, so a test can keep one counter and hand
/// it to every instance it creates.
#[derive(Debug, Clone, Default)]
pub struct StateCounter {
    live: Arc<AtomicUsize>,
}

impl StateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked instances currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// A state type whose constructions and drops are observable.
///
/// Deliberately not `Clone`: a cache under test can only ever share an
/// instance, never copy it, so live counts translate directly into
/// retention claims.
#[derive(Debug)]
pub struct TrackedState {
    label: String,
    live: Arc<AtomicUsize>,
}

impl TrackedState {
    pub fn new(label: impl Into<String>, counter: &StateCounter) -> Self {
        counter.live.fetch_add(1, Ordering::SeqCst);
        Self {
            label: label.into(),
            live: Arc::clone(&counter.live),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for TrackedState {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for CHAMBER key and handle types.

    use super::*;
    use chrono::DateTime;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use uuid::Uuid;

    // === Identity Generators ===

    /// Generate a random UUID identity.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    // === Key Generators ===

    /// Generate a member value across every [`KeyValue`] variant.
    pub fn arb_key_value() -> impl Strategy<Value = KeyValue> {
        prop_oneof![
            "[a-zA-Z0-9@._-]{0,24}".prop_map(KeyValue::Text),
            any::<i64>().prop_map(KeyValue::Integer),
            any::<bool>().prop_map(KeyValue::Boolean),
            any::<[u8; 16]>().prop_map(|bytes| KeyValue::Uuid(Uuid::from_bytes(bytes))),
            (0i64..4_000_000_000).prop_filter_map("timestamp out of range", |secs| {
                DateTime::from_timestamp(secs, 0).map(KeyValue::Timestamp)
            }),
            vec(any::<u8>(), 0..16).prop_map(KeyValue::Bytes),
        ]
    }

    /// Generate a named key member.
    pub fn arb_member() -> impl Strategy<Value = (String, KeyValue)> {
        ("[a-z_]{1,16}", arb_key_value())
    }

    /// Generate an entity name in type-name style.
    pub fn arb_entity_name() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z]{0,12}"
    }

    /// Generate a whole unique key with 1 to 4 members.
    pub fn arb_unique_key() -> impl Strategy<Value = UniqueKey> {
        (arb_entity_name(), arb_member(), vec(arb_member(), 0..3)).prop_map(
            |(entity, (member, value), rest)| {
                rest.into_iter()
                    .fold(UniqueKey::new(entity, member, value), |key, (name, value)| {
                        key.with_member(name, value)
                    })
            },
        )
    }

    // === Handle Generators ===

    /// Generate a handle around a short string state. Every generated
    /// handle is a distinct instance.
    pub fn arb_state_handle() -> impl Strategy<Value = StateHandle<String>> {
        "[a-z0-9 ]{0,24}".prop_map(StateHandle::new)
    }

    /// Generate a batch of identity entries ready for bulk loading.
    pub fn arb_cache_entries() -> impl Strategy<Value = Vec<(Uuid, StateHandle<String>)>> {
        vec((arb_uuid(), arb_state_handle()), 0..32)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common caching scenarios.

    use super::*;

    /// Single-member unique key over an email address.
    pub fn email_key(address: &str) -> UniqueKey {
        UniqueKey::new("Account", "email", address)
    }

    /// Composite unique key scoping an email to a tenant.
    pub fn tenant_email_key(tenant: i64, address: &str) -> UniqueKey {
        UniqueKey::new("Account", "tenant", tenant).with_member("email", address)
    }

    /// Handle around a plain string state.
    pub fn labeled_handle(label: &str) -> StateHandle<String> {
        StateHandle::new(label.to_string())
    }

    /// Handle around a drop-instrumented state.
    pub fn tracked_handle(label: &str, counter: &StateCounter) -> StateHandle<TrackedState> {
        StateHandle::new(TrackedState::new(label, counter))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for cache results and handle identity.

    use super::*;

    /// Assert that a result is Ok.
    pub fn assert_ok<T: std::fmt::Debug>(result: &ChamberResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got: {:?}", result);
    }

    /// Assert that a result is Err.
    pub fn assert_err<T: std::fmt::Debug>(result: &ChamberResult<T>) {
        assert!(result.is_err(), "Expected Err, got: {:?}", result);
    }

    /// Assert that a result failed with an integrity error.
    pub fn assert_integrity_error<T: std::fmt::Debug>(result: &ChamberResult<T>) {
        match result {
            Err(ChamberError::Integrity(_)) => {}
            other => panic!("Expected integrity error, got: {:?}", other),
        }
    }

    /// Assert that a result failed with a key error.
    pub fn assert_key_error<T: std::fmt::Debug>(result: &ChamberResult<T>) {
        match result {
            Err(ChamberError::Key(_)) => {}
            other => panic!("Expected key error, got: {:?}", other),
        }
    }

    /// Assert that two handles refer to the same managed instance.
    pub fn assert_same_handle<S: ?Sized>(a: &StateHandle<S>, b: &StateHandle<S>) {
        assert!(
            StateHandle::same(a, b),
            "Expected handles to share one instance"
        );
    }

    /// Assert that two handles refer to distinct managed instances.
    pub fn assert_distinct_handles<S: ?Sized>(a: &StateHandle<S>, b: &StateHandle<S>) {
        assert!(
            !StateHandle::same(a, b),
            "Expected handles to be distinct instances"
        );
    }

    /// Assert the number of live tracked instances.
    pub fn assert_live(counter: &StateCounter, expected: usize) {
        assert_eq!(
            counter.live(),
            expected,
            "Live instance count mismatch"
        );
    }
}
