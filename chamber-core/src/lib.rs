//! CHAMBER Core - Key and Handle Types
//!
//! Pure data types for the CHAMBER unit-of-work cache. No cache logic lives
//! here; the cache contract and its implementations are in chamber-cache.

pub mod error;
pub mod handle;
pub mod unique_key;

pub use error::{ChamberError, ChamberResult, IntegrityError, KeyError};
pub use handle::StateHandle;
pub use unique_key::{KeyValue, UniqueKey};
