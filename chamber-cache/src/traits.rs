//! Cache contract and occupancy statistics.
//!
//! This module defines the operations every level 1 cache answers for its
//! owning unit of work, independent of how entries are retained.

use chamber_core::{StateHandle, UniqueKey};

/// Contract for level 1 (unit of work) identity caches.
///
/// A level 1 cache is owned by exactly one unit of work and is driven
/// synchronously from it, so every mutation takes `&mut self` and no
/// method blocks. Implementations maintain two lookup structures:
///
/// # Identity Map
///
/// At most one [`StateHandle`] per identity `I`. This is the structure
/// that guarantees a unit of work never holds two live copies of the same
/// persistent object.
///
/// # Unique Index
///
/// A secondary map from [`UniqueKey`] to handles, answering "which cached
/// state satisfied this unique constraint" without a storage round trip.
/// The index is derived data: the identity map is always authoritative,
/// and removal of an identity entry cascades into the index.
///
/// # Identity vs. Value
///
/// Identities and unique keys compare by value. Handles compare by
/// reference ([`StateHandle::same`]), never by structural equality of the
/// managed state.
pub trait IdentityCache<I, S: ?Sized> {
    /// Associate `id` with `handle` in the identity map.
    ///
    /// Returns the handle previously associated with `id`, if any. The
    /// unique index is untouched, so overwriting an identity entry can
    /// strand index bindings to the displaced handle; callers that use
    /// the unique index remove the old entry first.
    fn put(&mut self, id: I, handle: StateHandle<S>) -> Option<StateHandle<S>>;

    /// Look up the handle cached under `id`.
    fn get(&self, id: &I) -> Option<&StateHandle<S>>;

    /// Whether an entry exists under `id`.
    fn contains_id(&self, id: &I) -> bool;

    /// Whether any identity entry holds this exact handle.
    ///
    /// Comparison is by reference identity, and the scan is linear in the
    /// number of identity entries.
    fn contains_handle(&self, handle: &StateHandle<S>) -> bool;

    /// Remove the entry under `id`, cascading into the unique index.
    ///
    /// Every unique-index binding that refers to the removed handle is
    /// dropped in the same call, which costs a sweep over the index.
    /// Returns the removed handle, or `None` if `id` was absent (in which
    /// case the index is untouched).
    fn remove(&mut self, id: &I) -> Option<StateHandle<S>>;

    /// Drop every entry from the identity map and the unique index.
    fn clear(&mut self);

    /// Number of identity entries. Unique-index bindings do not count.
    fn len(&self) -> usize;

    /// Whether the identity map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the handle bound to a unique key.
    fn get_unique(&self, key: &UniqueKey) -> Option<&StateHandle<S>>;

    /// Bind a unique key to a handle, returning the displaced handle.
    ///
    /// The binding is taken on faith: the cache does not verify that
    /// `handle` is present in the identity map. Callers sequence
    /// [`put`](IdentityCache::put) before `put_unique`;
    /// [`StrongRefCache::check_integrity`](crate::StrongRefCache::check_integrity)
    /// exists to audit that sequencing in tests.
    fn put_unique(&mut self, key: UniqueKey, handle: StateHandle<S>) -> Option<StateHandle<S>>;

    /// Copy every entry of `entries` into the identity map.
    ///
    /// Equivalent to calling [`put`](IdentityCache::put) per entry;
    /// displaced handles are dropped.
    fn put_all<T>(&mut self, entries: T)
    where
        T: IntoIterator<Item = (I, StateHandle<S>)>,
        Self: Sized,
    {
        for (id, handle) in entries {
            self.put(id, handle);
        }
    }

    /// Current occupancy of both lookup structures.
    fn stats(&self) -> CacheStats;
}

/// Occupancy statistics for one cache instance.
///
/// `len` only reports the identity map; this struct is the one place the
/// unique index's size is observable, which matters when auditing index
/// cleanup after removals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in the identity map.
    pub identity_entries: usize,
    /// Number of bindings in the unique index.
    pub unique_entries: usize,
}

impl CacheStats {
    /// Total entries held across both structures.
    pub fn total_entries(&self) -> usize {
        self.identity_entries + self.unique_entries
    }
}
