//! # Subscriber Signatures
//!
//! A `Signature` is the composite `(namespace, identifier)` key that names a
//! subscriber. Indexes treat it as an opaque ordered key.
//!
//! Callers may hand the catalog a subscriber in three shapes, all captured
//! by [`SubscriberRef`] and normalized once at the entry of each operation:
//! - an already-validated `Signature`
//! - raw key parts (checked for arity and emptiness on normalization)
//! - any value implementing [`Subscriber`]

use crate::SubscribeError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// SIGNATURE
// =============================================================================

/// Composite key identifying a subscriber within a namespace.
///
/// Both components are non-empty. The only way to obtain a `Signature` is
/// through a validating constructor, deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(String, String)", into = "(String, String)")]
pub struct Signature {
    namespace: String,
    identifier: String,
}

impl Signature {
    /// Build a signature, rejecting empty components.
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, SubscribeError> {
        let namespace = namespace.into();
        let identifier = identifier.into();
        if namespace.is_empty() {
            return Err(SubscribeError::InvalidSignature(
                "namespace must be non-empty".to_string(),
            ));
        }
        if identifier.is_empty() {
            return Err(SubscribeError::InvalidSignature(
                "identifier must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            namespace,
            identifier,
        })
    }

    /// Signature in the `email` namespace for a bare address.
    pub fn email(address: impl Into<String>) -> Result<Self, SubscribeError> {
        Self::new(crate::primitives::EMAIL_NAMESPACE, address)
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The identifier within the namespace.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.namespace, self.identifier)
    }
}

impl TryFrom<(String, String)> for Signature {
    type Error = SubscribeError;

    fn try_from((namespace, identifier): (String, String)) -> Result<Self, Self::Error> {
        Self::new(namespace, identifier)
    }
}

impl TryFrom<(&str, &str)> for Signature {
    type Error = SubscribeError;

    fn try_from((namespace, identifier): (&str, &str)) -> Result<Self, Self::Error> {
        Self::new(namespace, identifier)
    }
}

impl<S: AsRef<str>> TryFrom<&[S]> for Signature {
    type Error = SubscribeError;

    fn try_from(parts: &[S]) -> Result<Self, Self::Error> {
        match parts {
            [namespace, identifier] => Self::new(namespace.as_ref(), identifier.as_ref()),
            _ => Err(SubscribeError::InvalidSignature(format!(
                "expected 2 elements, got {}",
                parts.len()
            ))),
        }
    }
}

impl TryFrom<Vec<String>> for Signature {
    type Error = SubscribeError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        Self::try_from(parts.as_slice())
    }
}

impl From<Signature> for (String, String) {
    fn from(signature: Signature) -> Self {
        (signature.namespace, signature.identifier)
    }
}

// =============================================================================
// SUBSCRIBER CAPABILITY
// =============================================================================

/// Anything that can produce a subscriber signature.
///
/// Record types with optional identity fields implement this and report
/// `InvalidSubscriber` (or `InvalidSignature`) when they cannot.
pub trait Subscriber {
    fn signature(&self) -> Result<Signature, SubscribeError>;
}

impl Subscriber for Signature {
    fn signature(&self) -> Result<Signature, SubscribeError> {
        Ok(self.clone())
    }
}

// =============================================================================
// SUBSCRIBER REFERENCE (API BOUNDARY)
// =============================================================================

/// The accepted shapes of a subscriber argument.
#[derive(Clone)]
pub enum SubscriberRef<'a> {
    /// A validated signature.
    Signature(Signature),
    /// Unvalidated composite key parts, e.g. decoded from a wire format.
    Raw(Vec<String>),
    /// A subscriber-like value that can produce its own signature.
    Subscriber(&'a dyn Subscriber),
}

impl SubscriberRef<'_> {
    /// Normalize to a signature.
    pub fn signature(&self) -> Result<Signature, SubscribeError> {
        match self {
            Self::Signature(signature) => Ok(signature.clone()),
            Self::Raw(parts) => Signature::try_from(parts.as_slice()),
            Self::Subscriber(subscriber) => subscriber.signature(),
        }
    }
}

impl fmt::Debug for SubscriberRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signature(signature) => f.debug_tuple("Signature").field(signature).finish(),
            Self::Raw(parts) => f.debug_tuple("Raw").field(parts).finish(),
            Self::Subscriber(_) => f.write_str("Subscriber(..)"),
        }
    }
}

impl From<Signature> for SubscriberRef<'_> {
    fn from(signature: Signature) -> Self {
        Self::Signature(signature)
    }
}

impl From<&Signature> for SubscriberRef<'_> {
    fn from(signature: &Signature) -> Self {
        Self::Signature(signature.clone())
    }
}

impl From<(&str, &str)> for SubscriberRef<'_> {
    fn from((namespace, identifier): (&str, &str)) -> Self {
        Self::Raw(vec![namespace.to_string(), identifier.to_string()])
    }
}

impl From<(String, String)> for SubscriberRef<'_> {
    fn from((namespace, identifier): (String, String)) -> Self {
        Self::Raw(vec![namespace, identifier])
    }
}

impl From<Vec<String>> for SubscriberRef<'_> {
    fn from(parts: Vec<String>) -> Self {
        Self::Raw(parts)
    }
}

impl<'a> From<&'a dyn Subscriber> for SubscriberRef<'a> {
    fn from(subscriber: &'a dyn Subscriber) -> Self {
        Self::Subscriber(subscriber)
    }
}

// =============================================================================
// TESTS
// =============================================================================
