//! Shared state handles with reference-identity semantics.
//!
//! A [`StateHandle`] is the unit the cache stores: a shared, strongly held
//! reference to one managed state instance. Cloning a handle never clones
//! the state; every clone refers to the same instance.
//!
//! # Design
//!
//! Identity, not structure. Two handles are "the same" when they point at
//! the same managed instance, even if two distinct instances happen to be
//! structurally equal. Identity-sensitive cache operations (reverse lookup,
//! removal cascade) compare handles with [`StateHandle::same`], which
//! mirrors [`Arc::ptr_eq`]. Comparison helpers are associated functions in
//! the [`Arc`] style so they never shadow methods of the managed state.

use std::fmt;
use std::sync::Arc;

/// A strong, shared reference to one managed state instance.
///
/// Handles are cheap to clone (one atomic increment) and keep the
/// underlying state alive for as long as any clone exists. A cache holding
/// a handle therefore pins the state in memory until the entry is removed
/// or the cache is cleared.
pub struct StateHandle<S: ?Sized> {
    state: Arc<S>,
}

impl<S> StateHandle<S> {
    /// Wrap a freshly constructed state instance in a new handle.
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(state),
        }
    }
}

impl<S: ?Sized> StateHandle<S> {
    /// Wrap an already-shared state instance.
    ///
    /// Useful when the owning engine manages state through [`Arc`] directly
    /// and hands the cache a clone of its own reference.
    pub fn from_arc(state: Arc<S>) -> Self {
        Self { state }
    }

    /// Unwrap the handle into its underlying shared reference.
    pub fn into_arc(this: Self) -> Arc<S> {
        this.state
    }

    /// Borrow the managed state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Whether two handles refer to the same managed instance.
    ///
    /// This is reference identity, not structural equality: two handles
    /// wrapping distinct but equal states are not the same.
    pub fn same(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.state, &other.state)
    }

    /// Number of live handles (strong references) to the managed instance.
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.state)
    }
}

impl<S: ?Sized> Clone for StateHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: ?Sized> AsRef<S> for StateHandle<S> {
    fn as_ref(&self) -> &S {
        &self.state
    }
}

impl<S: ?Sized> From<Arc<S>> for StateHandle<S> {
    fn from(state: Arc<S>) -> Self {
        Self { state }
    }
}

impl<S: ?Sized> fmt::Debug for StateHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("instance", &Arc::as_ptr(&self.state))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_instance() {
        let a = StateHandle::new(String::from("tenant-a"));
        let b = a.clone();
        assert!(StateHandle::same(&a, &b));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_equal_states_are_distinct_instances() {
        let a = StateHandle::new(String::from("same content"));
        let b = StateHandle::new(String::from("same content"));
        assert_eq!(a.state(), b.state());
        assert!(!StateHandle::same(&a, &b));
    }

    #[test]
    fn test_strong_count_tracks_live_clones() {
        let a = StateHandle::new(42u64);
        assert_eq!(StateHandle::strong_count(&a), 1);
        let b = a.clone();
        assert_eq!(StateHandle::strong_count(&a), 2);
        drop(b);
        assert_eq!(StateHandle::strong_count(&a), 1);
    }

    #[test]
    fn test_from_arc_preserves_identity() {
        let shared = Arc::new(7i32);
        let a = StateHandle::from_arc(Arc::clone(&shared));
        let b = StateHandle::from_arc(shared);
        assert!(StateHandle::same(&a, &b));
    }

    #[test]
    fn test_into_arc_round_trips() {
        let handle = StateHandle::new(String::from("state"));
        let copy = handle.clone();
        let arc = StateHandle::into_arc(handle);
        assert!(Arc::ptr_eq(&arc, &StateHandle::into_arc(copy)));
    }

    #[test]
    fn test_handles_support_unsized_state() {
        let a: StateHandle<dyn fmt::Debug> = StateHandle::from_arc(Arc::new(42u32));
        let b = a.clone();
        assert!(StateHandle::same(&a, &b));
    }

    #[test]
    fn test_as_ref_borrows_the_state() {
        let handle = StateHandle::new(vec![1u8, 2, 3]);
        assert_eq!(handle.as_ref().len(), 3);
    }

    #[test]
    fn test_debug_names_the_handle_not_the_state() {
        let handle = StateHandle::new(1u8);
        let rendered = format!("{:?}", handle);
        assert!(rendered.contains("StateHandle"));
        assert!(rendered.contains("instance"));
    }
}
