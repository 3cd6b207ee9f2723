//! # Subscriber Records
//!
//! `ItemSubscriber` is the default subscriber record: a party known by a
//! user id within a namespace, by an email address, or both.
//! `SubscribersContainer` stores records keyed by their own signature and is
//! the default [`SubscriberStore`] for a catalog.

use crate::primitives::DEFAULT_NAMESPACE;
use crate::resolver::SubscriberStore;
use crate::signature::{Signature, Subscriber, SubscriberRef};
use crate::SubscribeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// ITEM SUBSCRIBER
// =============================================================================

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// A principal, party or person that can be related to content items.
///
/// Either `user` or `email` must be present for the record to have a
/// signature. When `user` is present it wins and is paired with
/// `namespace`; an email-only record is signed as `("email", address)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSubscriber {
    /// System user id; a member id or a generated token.
    #[serde(default)]
    pub user: Option<String>,
    /// Namespace of `user`.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Full display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for ItemSubscriber {
    fn default() -> Self {
        Self {
            user: None,
            namespace: default_namespace(),
            email: None,
            name: None,
        }
    }
}

impl ItemSubscriber {
    /// A subscriber known by user id in the default namespace.
    #[must_use]
    pub fn member(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    /// A subscriber known only by email address.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Set the namespace used when a user id is present.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check that the record carries enough identity to be signed.
    pub fn validate(&self) -> Result<(), SubscribeError> {
        if non_empty(self.user.as_deref()).is_none() && non_empty(self.email.as_deref()).is_none()
        {
            return Err(SubscribeError::InvalidSubscriber(
                "neither email nor user id provided".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Subscriber for ItemSubscriber {
    fn signature(&self) -> Result<Signature, SubscribeError> {
        self.validate()?;
        match (
            non_empty(self.user.as_deref()),
            non_empty(self.email.as_deref()),
        ) {
            (Some(user), _) => Signature::new(self.namespace.as_str(), user),
            (None, Some(email)) => Signature::email(email),
            (None, None) => Err(SubscribeError::InvalidSubscriber(
                "neither email nor user id provided".to_string(),
            )),
        }
    }
}

impl<'a> From<&'a ItemSubscriber> for SubscriberRef<'a> {
    fn from(subscriber: &'a ItemSubscriber) -> Self {
        Self::Subscriber(subscriber)
    }
}

// =============================================================================
// SUBSCRIBERS CONTAINER
// =============================================================================

/// In-memory store of subscriber records keyed by signature.
///
/// Keys are derived from the records themselves, so lookups accept either a
/// signature or any subscriber-like value that produces one.
#[derive(Debug, Clone, Default)]
pub struct SubscribersContainer {
    records: BTreeMap<Signature, ItemSubscriber>,
}

impl SubscribersContainer {
    /// Empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record under its signature and return that signature.
    ///
    /// Existing records are never replaced; a second record with the same
    /// signature fails with `DuplicateSubscriber`.
    pub fn add(&mut self, subscriber: ItemSubscriber) -> Result<Signature, SubscribeError> {
        let signature = subscriber.signature()?;
        if self.records.contains_key(&signature) {
            return Err(SubscribeError::DuplicateSubscriber(signature));
        }
        self.records.insert(signature.clone(), subscriber);
        Ok(signature)
    }

    /// Look up a record by signature or by a subscriber used as a template.
    pub fn get<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
    ) -> Result<Option<&ItemSubscriber>, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self.records.get(&signature))
    }

    /// Look up a record stored under `("email", address)`.
    #[must_use]
    pub fn get_by_email(&self, address: &str) -> Option<&ItemSubscriber> {
        let signature = Signature::email(address).ok()?;
        self.records.get(&signature)
    }

    /// Whether a record is stored for the subscriber.
    pub fn contains<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
    ) -> Result<bool, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self.records.contains_key(&signature))
    }

    /// Remove and return the record for a signature or template subscriber.
    pub fn remove<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
    ) -> Result<Option<ItemSubscriber>, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self.records.remove(&signature))
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &ItemSubscriber)> {
        self.records.iter()
    }
}

impl SubscriberStore for SubscribersContainer {
    type Subscriber = ItemSubscriber;

    fn lookup(&self, signature: &Signature) -> Option<ItemSubscriber> {
        self.records.get(signature).cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================
