//! Strong-reference cache, the default level 1 implementation.
//!
//! # Retention
//!
//! Entries are held with strong references: putting a handle pins its
//! state in memory until the owning unit of work removes it or clears the
//! cache. Nothing is ever evicted or expired, and there is no capacity
//! ceiling. A level 1 cache is expected to die young, with the unit of
//! work that owns it.
//!
//! # Cost Model
//!
//! Primary operations are hash-map lookups. The two deliberate
//! exceptions, documented on the trait, are
//! [`contains_handle`](IdentityCache::contains_handle) (linear in
//! identity entries) and [`remove`](IdentityCache::remove) (linear in
//! unique-index bindings, the price of the removal cascade). Both scans
//! compare handles by reference, so no state is ever inspected.

use crate::traits::{CacheStats, IdentityCache};
use chamber_core::{ChamberResult, IntegrityError, StateHandle, UniqueKey};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Identity map plus unique-key index, both holding strong references.
///
/// One instance serves one unit of work and is driven synchronously from
/// it. The type itself takes no locks; wrap it if it ever has to cross
/// threads mid-flight.
pub struct StrongRefCache<I, S: ?Sized> {
    by_id: HashMap<I, StateHandle<S>>,
    by_unique: HashMap<UniqueKey, StateHandle<S>>,
}

impl<I, S: ?Sized> StrongRefCache<I, S> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_unique: HashMap::new(),
        }
    }

    /// Create an empty cache sized for an expected number of identity
    /// entries. The unique index sizes itself on demand.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_id: HashMap::with_capacity(capacity),
            by_unique: HashMap::new(),
        }
    }

    /// Iterate over the cached identities. Order is arbitrary.
    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.by_id.keys()
    }

    /// Iterate over the cached handles. Order is arbitrary.
    pub fn handles(&self) -> impl Iterator<Item = &StateHandle<S>> {
        self.by_id.values()
    }

    /// Iterate over identity entries as `(identity, handle)` pairs.
    /// Order is arbitrary.
    pub fn iter(&self) -> impl Iterator<Item = (&I, &StateHandle<S>)> {
        self.by_id.iter()
    }

    /// Verify that every unique-index binding refers to a handle still
    /// present in the identity map.
    ///
    /// The identity map is authoritative and the index is derived from
    /// it, but [`put_unique`](IdentityCache::put_unique) takes bindings
    /// on faith and [`put`](IdentityCache::put) can displace a handle
    /// the index still refers to. This sweep makes such drift visible.
    /// It costs a scan of the identity map per binding, so it belongs in
    /// tests and debug builds, not on hot paths.
    pub fn check_integrity(&self) -> ChamberResult<()> {
        for (key, bound) in &self.by_unique {
            let reachable = self
                .by_id
                .values()
                .any(|held| StateHandle::same(held, bound));
            if !reachable {
                return Err(IntegrityError::DanglingUniqueKey { key: key.clone() }.into());
            }
        }
        Ok(())
    }
}

impl<I, S: ?Sized> Default for StrongRefCache<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S: ?Sized> fmt::Debug for StrongRefCache<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrongRefCache")
            .field("identity_entries", &self.by_id.len())
            .field("unique_entries", &self.by_unique.len())
            .finish()
    }
}

impl<I, S> IdentityCache<I, S> for StrongRefCache<I, S>
where
    I: Eq + Hash,
    S: ?Sized,
{
    fn put(&mut self, id: I, handle: StateHandle<S>) -> Option<StateHandle<S>> {
        self.by_id.insert(id, handle)
    }

    fn get(&self, id: &I) -> Option<&StateHandle<S>> {
        self.by_id.get(id)
    }

    fn contains_id(&self, id: &I) -> bool {
        self.by_id.contains_key(id)
    }

    fn contains_handle(&self, handle: &StateHandle<S>) -> bool {
        self.by_id.values().any(|held| StateHandle::same(held, handle))
    }

    fn remove(&mut self, id: &I) -> Option<StateHandle<S>> {
        let removed = self.by_id.remove(id)?;

        let before = self.by_unique.len();
        self.by_unique
            .retain(|_, bound| !StateHandle::same(bound, &removed));
        let dropped = before - self.by_unique.len();
        if dropped > 0 {
            tracing::trace!(
                unique_bindings_dropped = dropped,
                "Cascaded identity removal into unique index"
            );
        }

        Some(removed)
    }

    fn clear(&mut self) {
        tracing::debug!(
            identity_entries = self.by_id.len(),
            unique_entries = self.by_unique.len(),
            "Clearing unit-of-work cache"
        );
        self.by_id.clear();
        self.by_unique.clear();
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }

    fn get_unique(&self, key: &UniqueKey) -> Option<&StateHandle<S>> {
        self.by_unique.get(key)
    }

    fn put_unique(&mut self, key: UniqueKey, handle: StateHandle<S>) -> Option<StateHandle<S>> {
        self.by_unique.insert(key, handle)
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            identity_entries: self.by_id.len(),
            unique_entries: self.by_unique.len(),
        }
    }
}

impl<I, S> Extend<(I, StateHandle<S>)> for StrongRefCache<I, S>
where
    I: Eq + Hash,
    S: ?Sized,
{
    fn extend<T: IntoIterator<Item = (I, StateHandle<S>)>>(&mut self, iter: T) {
        self.by_id.extend(iter);
    }
}

impl<'a, I, S: ?Sized> IntoIterator for &'a StrongRefCache<I, S> {
    type Item = (&'a I, &'a StateHandle<S>);
    type IntoIter = std::collections::hash_map::Iter<'a, I, StateHandle<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_id.iter()
    }
}

/// Consuming iteration drains the identity map, for engines that migrate
/// surviving instances to a longer-lived cache at commit. Unique-index
/// bindings are dropped.
impl<I, S: ?Sized> IntoIterator for StrongRefCache<I, S> {
    type Item = (I, StateHandle<S>);
    type IntoIter = std::collections::hash_map::IntoIter<I, StateHandle<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_id.into_iter()
    }
}
