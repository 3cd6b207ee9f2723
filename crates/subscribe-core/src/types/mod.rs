//! # Core Type Definitions
//!
//! This module contains the small value types shared by every layer of the
//! subscription catalog:
//! - Item identifiers (`ItemUid`)
//! - Edge metadata (`Metadata`)
//! - Error types (`SubscribeError`)
//!
//! ## Ordering Guarantees
//!
//! All key types implement `Ord` so they can live in `BTreeMap`/`BTreeSet`
//! and every result sequence comes out in a stable, sorted order.

use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ITEM IDENTIFIER
// =============================================================================

/// Opaque identifier of a content item.
///
/// The catalog only ever compares UIDs; it never parses them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemUid(String);

impl ItemUid {
    /// Create a UID from any string-like value.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Get the UID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the UID is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ItemUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemUid {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

impl From<String> for ItemUid {
    fn from(uid: String) -> Self {
        Self(uid)
    }
}

impl From<&String> for ItemUid {
    fn from(uid: &String) -> Self {
        Self::new(uid.as_str())
    }
}

impl From<&ItemUid> for ItemUid {
    fn from(uid: &ItemUid) -> Self {
        uid.clone()
    }
}

// =============================================================================
// EDGE METADATA
// =============================================================================

/// Schemaless name/value record attached to one subscription edge.
pub type Metadata = BTreeMap<String, String>;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the subscription catalog.
///
/// - "Not found" is never an error: lookups return empty results or `None`
/// - A failed call leaves every structure exactly as it was
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// A value presented as a subscriber signature is not two non-empty strings.
    #[error("Invalid subscriber signature: {0}")]
    InvalidSignature(String),

    /// A search query or criterion has an unrecognized shape.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A relationship name was empty.
    #[error("Invalid relationship name: names must be non-empty")]
    InvalidName,

    /// A subscriber record cannot produce a signature.
    #[error("Invalid subscriber: {0}")]
    InvalidSubscriber(String),

    /// A subscriber record with the same signature is already stored.
    #[error("Duplicate subscriber: {0}")]
    DuplicateSubscriber(Signature),

    /// A subscription key or key entry is malformed.
    #[error("Invalid subscription key: {0}")]
    InvalidKey(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_conversions_agree() {
        let owned = String::from("U1");
        assert_eq!(ItemUid::from("U1"), ItemUid::from(owned.clone()));
        assert_eq!(ItemUid::from(&owned), ItemUid::new("U1"));
        assert_eq!(ItemUid::new("U1").to_string(), "U1");
    }

    #[test]
    fn uid_ordering_is_lexicographic() {
        let mut uids = vec![ItemUid::new("b"), ItemUid::new("a"), ItemUid::new("c")];
        uids.sort();
        let as_str: Vec<_> = uids.iter().map(ItemUid::as_str).collect();
        assert_eq!(as_str, vec!["a", "b", "c"]);
    }

    #[test]
    fn error_messages_carry_context() {
        let err = SubscribeError::InvalidQuery("number".to_string());
        assert_eq!(err.to_string(), "Invalid query: number");
    }
}
