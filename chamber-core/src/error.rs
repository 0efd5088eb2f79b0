//! Error types for CHAMBER operations

use crate::unique_key::UniqueKey;
use thiserror::Error;

/// Key construction errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Unique key for '{entity}' has no members")]
    NoMembers { entity: String },
}

/// Cache integrity violations.
///
/// Normal cache operations never produce these. They come out of explicit
/// integrity sweeps, which callers run in tests and debug builds to catch
/// index drift caused by mis-sequenced writes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Unique key {key} is bound to a handle absent from the identity map")]
    DanglingUniqueKey { key: UniqueKey },
}

/// Master error type for all CHAMBER errors.
#[derive(Debug, Clone, Error)]
pub enum ChamberError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),
}

/// Result type alias for CHAMBER operations.
pub type ChamberResult<T> = Result<T, ChamberError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_error_display_no_members() {
        let err = KeyError::NoMembers {
            entity: "Account".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("no members"));
        assert!(msg.contains("Account"));
    }

    #[test]
    fn test_integrity_error_display_dangling_key() {
        let err = IntegrityError::DanglingUniqueKey {
            key: UniqueKey::new("Account", "email", "ada@example.org"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("absent from the identity map"));
        assert!(msg.contains("Account"));
        assert!(msg.contains("ada@example.org"));
    }

    #[test]
    fn test_master_error_wraps_key_error() {
        let err: ChamberError = KeyError::NoMembers {
            entity: "Account".to_string(),
        }
        .into();
        let msg = format!("{}", err);
        assert!(msg.contains("Key error"));
        assert!(msg.contains("no members"));
    }

    #[test]
    fn test_master_error_wraps_integrity_error() {
        let err: ChamberError = IntegrityError::DanglingUniqueKey {
            key: UniqueKey::new("Account", "email", "ada@example.org"),
        }
        .into();
        let msg = format!("{}", err);
        assert!(msg.contains("Integrity error"));
        assert!(msg.contains("ada@example.org"));
    }
}
