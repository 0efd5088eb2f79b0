//! Unique-key types for the secondary (unique result) cache index.
//!
//! A [`UniqueKey`] names one unique-constraint lookup: the entity kind it
//! applies to plus an ordered list of member values. Keys compare by VALUE,
//! so a probe key built at query time matches the key stored at put time
//! without sharing any allocation.
//!
//! # Design
//!
//! A key always carries at least one member. The infallible constructors
//! ([`UniqueKey::new`] plus [`UniqueKey::with_member`]) make empty keys
//! unrepresentable by construction; the fallible [`UniqueKey::from_members`]
//! covers engines that assemble keys from runtime constraint metadata and
//! funnels the empty case into [`KeyError::NoMembers`]. Deserialization
//! goes through the same check.
//!
//! Member order is significant: `(email, tenant)` and `(tenant, email)` are
//! different keys. Callers build members in the declared order of the
//! unique constraint they mirror.

use crate::error::KeyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One member value inside a [`UniqueKey`].
///
/// Variants cover the column types unique constraints are declared over.
/// Floating-point values are deliberately absent: their equality semantics
/// make them unusable as hash-map key material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    /// UTF-8 string member.
    Text(String),
    /// Signed integer member. Narrower integer columns widen into this.
    Integer(i64),
    /// Boolean member.
    Boolean(bool),
    /// UUID member.
    Uuid(Uuid),
    /// UTC timestamp member.
    Timestamp(DateTime<Utc>),
    /// Opaque binary member.
    Bytes(Vec<u8>),
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Uuid> for KeyValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for KeyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<u8>> for KeyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Text(v) => write!(f, "\"{}\"", v),
            KeyValue::Integer(v) => write!(f, "{}", v),
            KeyValue::Boolean(v) => write!(f, "{}", v),
            KeyValue::Uuid(v) => write!(f, "{}", v),
            KeyValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            KeyValue::Bytes(v) => {
                write!(f, "0x")?;
                for byte in v {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// A value-equal key identifying one unique-constraint result.
///
/// # Design
///
/// Two keys are equal when their entity names and full member lists are
/// equal, member by member and in order. Equality and hashing are entirely
/// structural, which is what lets a secondary index answer "which cached
/// state satisfied this constraint" for a key rebuilt from scratch.
///
/// The member list is private and non-empty by construction; mutation after
/// construction is impossible, so a key's hash can never drift while it
/// sits inside an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawUniqueKey")]
pub struct UniqueKey {
    entity: String,
    members: Vec<(String, KeyValue)>,
}

/// Mirror of [`UniqueKey`] used to validate deserialized input.
#[derive(Deserialize)]
struct RawUniqueKey {
    entity: String,
    members: Vec<(String, KeyValue)>,
}

impl TryFrom<RawUniqueKey> for UniqueKey {
    type Error = KeyError;

    fn try_from(raw: RawUniqueKey) -> Result<Self, Self::Error> {
        Self::from_members(raw.entity, raw.members)
    }
}

impl UniqueKey {
    /// Create a key with its first member.
    ///
    /// # Arguments
    ///
    /// * `entity` - Name of the entity kind the constraint applies to
    /// * `member` - Name of the first constraint member
    /// * `value` - Value of the first constraint member
    pub fn new(
        entity: impl Into<String>,
        member: impl Into<String>,
        value: impl Into<KeyValue>,
    ) -> Self {
        Self {
            entity: entity.into(),
            members: vec![(member.into(), value.into())],
        }
    }

    /// Append a further member to a composite key.
    ///
    /// Members are compared in append order, so build them in the declared
    /// order of the constraint.
    pub fn with_member(mut self, member: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        self.members.push((member.into(), value.into()));
        self
    }

    /// Build a key from an already-collected member list.
    ///
    /// This is the entry point for engines that assemble keys from runtime
    /// constraint metadata rather than static call sites.
    ///
    /// # Returns
    ///
    /// `KeyError::NoMembers` if `members` is empty.
    pub fn from_members(
        entity: impl Into<String>,
        members: Vec<(String, KeyValue)>,
    ) -> Result<Self, KeyError> {
        let entity = entity.into();
        if members.is_empty() {
            return Err(KeyError::NoMembers { entity });
        }
        Ok(Self { entity, members })
    }

    /// Name of the entity kind this key applies to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The ordered member list, as `(member name, value)` pairs.
    pub fn members(&self) -> &[(String, KeyValue)] {
        &self.members
    }

    /// Number of members. Always at least 1.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether this key spans more than one member.
    pub fn is_composite(&self) -> bool {
        self.members.len() > 1
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.entity)?;
        for (position, (member, value)) in self.members.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", member, value)?;
        }
        write!(f, ")")
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    /// Strategy to generate random member values across every variant.
    fn key_value_strategy() -> impl Strategy<Value = KeyValue> {
        prop_oneof![
            "[a-zA-Z0-9@._-]{0,24}".prop_map(KeyValue::Text),
            any::<i64>().prop_map(KeyValue::Integer),
            any::<bool>().prop_map(KeyValue::Boolean),
            any::<[u8; 16]>().prop_map(|bytes| KeyValue::Uuid(Uuid::from_bytes(bytes))),
            (0i64..4_000_000_000).prop_map(|secs| {
                KeyValue::Timestamp(DateTime::from_timestamp(secs, 0).expect("in range"))
            }),
            vec(any::<u8>(), 0..16).prop_map(KeyValue::Bytes),
        ]
    }

    /// Strategy to generate named members.
    fn member_strategy() -> impl Strategy<Value = (String, KeyValue)> {
        ("[a-z_]{1,16}", key_value_strategy())
    }

    /// Strategy to generate whole keys with 1 to 4 members.
    fn unique_key_strategy() -> impl Strategy<Value = UniqueKey> {
        ("[A-Z][a-zA-Z]{0,12}", vec(member_strategy(), 1..4)).prop_map(|(entity, members)| {
            UniqueKey::from_members(entity, members).expect("generated member list is non-empty")
        })
    }

    fn hash_of(key: &UniqueKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: independently built keys with the same data are equal
        /// and hash identically.
        #[test]
        fn prop_value_equality_implies_hash_equality(
            entity in "[A-Z][a-zA-Z]{0,12}",
            members in vec(member_strategy(), 1..4),
        ) {
            let stored = UniqueKey::from_members(entity.clone(), members.clone())
                .expect("non-empty members");
            let probe = UniqueKey::from_members(entity, members).expect("non-empty members");

            prop_assert_eq!(&stored, &probe);
            prop_assert_eq!(hash_of(&stored), hash_of(&probe));
        }

        /// Property: swapping two distinct members produces a different key.
        #[test]
        fn prop_member_order_matters(
            entity in "[A-Z][a-zA-Z]{0,12}",
            first in member_strategy(),
            second in member_strategy(),
        ) {
            prop_assume!(first != second);

            let forward =
                UniqueKey::from_members(entity.clone(), vec![first.clone(), second.clone()])
                    .expect("two members");
            let reversed =
                UniqueKey::from_members(entity, vec![second, first]).expect("two members");

            prop_assert_ne!(forward, reversed);
        }

        /// Property: construction from a non-empty member list preserves
        /// entity, order, and count.
        #[test]
        fn prop_from_members_preserves_shape(
            entity in "[A-Z][a-zA-Z]{0,12}",
            members in vec(member_strategy(), 1..5),
        ) {
            let key = UniqueKey::from_members(entity.clone(), members.clone())
                .expect("non-empty members");

            prop_assert_eq!(key.entity(), entity.as_str());
            prop_assert_eq!(key.member_count(), members.len());
            prop_assert_eq!(key.members(), members.as_slice());
        }

        /// Property: serde round-trips preserve the key exactly.
        #[test]
        fn prop_serde_roundtrip(key in unique_key_strategy()) {
            let json = serde_json::to_string(&key).expect("serialize key");
            let back: UniqueKey = serde_json::from_str(&json).expect("deserialize key");

            prop_assert_eq!(key, back);
        }

        /// Property: the display form always names the entity and every member.
        #[test]
        fn prop_display_names_entity_and_members(key in unique_key_strategy()) {
            let rendered = key.to_string();

            prop_assert!(rendered.starts_with(key.entity()));
            for (member, _) in key.members() {
                prop_assert!(rendered.contains(member.as_str()));
            }
        }
    }
}
