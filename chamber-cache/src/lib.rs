//! CHAMBER Cache - Unit-of-Work Identity Caching
//!
//! This crate provides the level 1 cache a persistence engine keeps per
//! unit of work: one live state instance per persistent identity, plus a
//! secondary index answering unique-constraint lookups without a round
//! trip to storage.
//!
//! # Design Philosophy
//!
//! Identity caches that silently drop entries cause the worst ORM bug
//! class there is: two in-memory copies of one row. This cache holds
//! entries with strong references and NEVER evicts on its own. Entries
//! leave only through explicit [`IdentityCache::remove`] and
//! [`IdentityCache::clear`] calls issued by the owning unit of work.
//!
//! # Identity vs. Value
//!
//! Primary lookups and the unique index compare identities and unique
//! keys by VALUE, while handles compare by REFERENCE: two structurally
//! equal state instances are still two different instances. The
//! [`StateHandle`](chamber_core::StateHandle) type carries that
//! distinction through every operation, so a removal cascade can find
//! exactly the unique entries bound to the removed instance and no
//! others.
//!
//! # Example
//!
//! ```
//! use chamber_cache::{IdentityCache, StrongRefCache};
//! use chamber_core::{StateHandle, UniqueKey};
//!
//! let mut cache = StrongRefCache::new();
//! let account = StateHandle::new(String::from("account #42"));
//!
//! cache.put(42u64, account.clone());
//! cache.put_unique(UniqueKey::new("Account", "email", "ada@example.org"), account);
//!
//! assert!(cache.contains_id(&42));
//!
//! // Removal cascades into the unique index.
//! let evicted = cache.remove(&42);
//! assert!(evicted.is_some());
//! assert!(cache
//!     .get_unique(&UniqueKey::new("Account", "email", "ada@example.org"))
//!     .is_none());
//! assert!(cache.is_empty());
//! ```

pub mod strong;
pub mod traits;

pub use strong::StrongRefCache;
pub use traits::{CacheStats, IdentityCache};
