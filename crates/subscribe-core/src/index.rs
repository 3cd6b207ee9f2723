//! # Subscription Index
//!
//! One named, two-way multimap between item UIDs and subscriber signatures.
//!
//! - forward: UID → {Signature}
//! - reverse: Signature → {UID}
//!
//! Every mutation updates both sides, so `uid ∈ reverse[sig]` holds exactly
//! when `sig ∈ forward[uid]`. Keys whose set becomes empty are removed.

use crate::signature::{Signature, SubscriberRef};
use crate::{ItemUid, SubscribeError};
use std::collections::{BTreeMap, BTreeSet};

/// Forward and reverse mappings for a single relationship name.
///
/// Uses `BTreeMap`/`BTreeSet` so every snapshot comes out sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionIndex {
    /// Relationship name; metadata only.
    name: String,

    /// UID -> subscribers related to it
    forward: BTreeMap<ItemUid, BTreeSet<Signature>>,

    /// Signature -> items it is related to
    reverse: BTreeMap<Signature, BTreeSet<ItemUid>>,
}

impl SubscriptionIndex {
    /// Create an empty index for a relationship name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The relationship name this index records.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the index. Does not affect any other index.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Associate a subscriber with an item on both sides.
    ///
    /// Idempotent. Fails with `InvalidSignature` before touching either
    /// side when the subscriber cannot be normalized.
    pub fn index<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
    ) -> Result<(), SubscribeError> {
        let signature = subscriber.into().signature()?;
        self.insert(signature, uid.into());
        Ok(())
    }

    /// Remove any association between a subscriber and an item.
    ///
    /// Missing entries on either side are ignored.
    pub fn unindex<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
    ) -> Result<(), SubscribeError> {
        let signature = subscriber.into().signature()?;
        self.remove(&signature, &uid.into());
        Ok(())
    }

    /// UIDs related to a subscriber, sorted. Empty when unknown.
    pub fn item_uids_for<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
    ) -> Result<Vec<ItemUid>, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self.uids_of(&signature).cloned().collect())
    }

    /// Signatures related to an item, sorted. Empty when unknown.
    pub fn subscribers_for(&self, uid: impl Into<ItemUid>) -> Vec<Signature> {
        self.signatures_of(&uid.into()).cloned().collect()
    }

    /// Check whether the pair is related in this index.
    pub fn contains<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
    ) -> Result<bool, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self
            .reverse
            .get(&signature)
            .is_some_and(|uids| uids.contains(&uid.into())))
    }

    /// Whether the index holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of (subscriber, item) pairs in the index.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.reverse.values().map(BTreeSet::len).sum()
    }

    /// All pairs in deterministic (signature, uid) order.
    pub fn edges(&self) -> impl Iterator<Item = (&Signature, &ItemUid)> + '_ {
        self.reverse
            .iter()
            .flat_map(|(signature, uids)| uids.iter().map(move |uid| (signature, uid)))
    }

    // =========================================================================
    // INTERNAL (already-normalized keys)
    // =========================================================================

    pub(crate) fn insert(&mut self, signature: Signature, uid: ItemUid) {
        self.forward
            .entry(uid.clone())
            .or_default()
            .insert(signature.clone());
        self.reverse.entry(signature).or_default().insert(uid);
    }

    pub(crate) fn remove(&mut self, signature: &Signature, uid: &ItemUid) {
        if let Some(signatures) = self.forward.get_mut(uid) {
            signatures.remove(signature);
            if signatures.is_empty() {
                self.forward.remove(uid);
            }
        }
        if let Some(uids) = self.reverse.get_mut(signature) {
            uids.remove(uid);
            if uids.is_empty() {
                self.reverse.remove(signature);
            }
        }
    }

    pub(crate) fn uids_of(&self, signature: &Signature) -> impl Iterator<Item = &ItemUid> + '_ {
        self.reverse.get(signature).into_iter().flatten()
    }

    pub(crate) fn signatures_of(&self, uid: &ItemUid) -> impl Iterator<Item = &Signature> + '_ {
        self.forward.get(uid).into_iter().flatten()
    }
}

// =============================================================================
// TESTS
// =============================================================================
