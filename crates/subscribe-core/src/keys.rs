//! # Subscription Keys
//!
//! Opaque, URL-safe tokens that name one `(name, subscriber, item)`
//! relationship, e.g. for unsubscribe or confirmation links.
//!
//! A generated key is deterministic: the same triple always maps to the same
//! 22-character string (see [`primitives::KEY_DESCRIPTION`]).

use crate::primitives::{self, KEY_DIGEST_BYTES};
use crate::signature::{Signature, SubscriberRef};
use crate::{ItemUid, SubscribeError};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The relationship a key stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKey {
    pub name: String,
    pub signature: Signature,
    pub uid: ItemUid,
}

impl SubscriptionKey {
    fn validate(&self) -> Result<(), SubscribeError> {
        if self.name.is_empty() {
            return Err(SubscribeError::InvalidName);
        }
        if self.uid.is_empty() {
            return Err(SubscribeError::InvalidKey(
                "item uid must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mapping of string keys to the relationships they name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    entries: BTreeMap<String, SubscriptionKey>,
}

impl SubscriptionKeys {
    /// Empty key registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable description of the key format.
    #[must_use]
    pub fn key_description() -> &'static str {
        primitives::KEY_DESCRIPTION
    }

    /// Derive the key for a relationship without storing it.
    #[must_use]
    pub fn generate(name: &str, signature: &Signature, uid: &ItemUid) -> String {
        let path = format!(
            "{}/{}/{}/{}",
            name,
            signature.namespace(),
            signature.identifier(),
            uid
        );
        let digest = blake3::hash(path.as_bytes());
        let (head, _) = digest.as_bytes().split_at(KEY_DIGEST_BYTES);
        URL_SAFE_NO_PAD.encode(head)
    }

    /// Validate and store a relationship under its generated key.
    ///
    /// An existing entry under the same key is replaced.
    pub fn add<'a>(
        &mut self,
        name: &str,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
    ) -> Result<String, SubscribeError> {
        let entry = SubscriptionKey {
            name: name.to_string(),
            signature: subscriber.into().signature()?,
            uid: uid.into(),
        };
        entry.validate()?;
        let key = Self::generate(&entry.name, &entry.signature, &entry.uid);
        self.entries.insert(key.clone(), entry);
        Ok(key)
    }

    /// Store an entry under an explicit key, returning any entry it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        entry: SubscriptionKey,
    ) -> Result<Option<SubscriptionKey>, SubscribeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SubscribeError::InvalidKey(
                "subscription key must be non-empty".to_string(),
            ));
        }
        entry.validate()?;
        Ok(self.entries.insert(key, entry))
    }

    /// The entry stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SubscriptionKey> {
        self.entries.get(key)
    }

    /// Remove and return the entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<SubscriptionKey> {
        self.entries.remove(key)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubscriptionKey)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}
