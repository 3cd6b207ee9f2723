//! # Subscription Catalog
//!
//! Owns every named [`SubscriptionIndex`] plus the per-edge metadata slot,
//! and answers searches across them:
//!
//! - unnamed subscriber query: union of the subscriber's items over all indexes
//! - unnamed UID query: union of the item's subscribers over all indexes
//! - named query: intersection over the names that exist; unknown names are
//!   skipped, and a query naming no existing index yields nothing
//!
//! Indexes are created on first use by [`SubscriptionCatalog::index`] and are
//! never removed, even once empty.

use crate::formats::{CatalogSnapshot, IndexSnapshot, MetadataEntry};
use crate::index::SubscriptionIndex;
use crate::query::{Criterion, Hit, Names, Query, SearchResults};
use crate::resolver::{ItemResolver, SubscriberStore, Unresolved};
use crate::signature::{Signature, SubscriberRef};
use crate::subscriber::SubscribersContainer;
use crate::{ItemUid, Metadata, SubscribeError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace};

/// Metadata key: subject, object, predicate.
type EdgeKey = (Signature, ItemUid, String);

/// A criterion after normalization.
enum Lookup {
    ItemsOf(Signature),
    SubscribersOf(ItemUid),
}

/// Registry of named subscription indexes with a unified search surface.
///
/// `R` resolves item UIDs and `S` looks up subscriber records; both are
/// injected at construction and only used by `get_item`/`get_subscriber`.
pub struct SubscriptionCatalog<R = Unresolved, S = SubscribersContainer> {
    indexes: BTreeMap<String, SubscriptionIndex>,
    metadata: BTreeMap<EdgeKey, Metadata>,
    resolver: R,
    subscribers: S,
}

impl SubscriptionCatalog {
    /// Catalog with no item resolver and an empty subscriber container.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(Unresolved, SubscribersContainer::new())
    }
}

impl Default for SubscriptionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, S> fmt::Debug for SubscriptionCatalog<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionCatalog")
            .field("indexes", &self.indexes)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl<R, S> SubscriptionCatalog<R, S> {
    /// Catalog with explicit resolution capabilities.
    pub fn with_capabilities(resolver: R, subscribers: S) -> Self {
        Self {
            indexes: BTreeMap::new(),
            metadata: BTreeMap::new(),
            resolver,
            subscribers,
        }
    }

    // =========================================================================
    // INDEXING
    // =========================================================================

    /// Relate a subscriber to an item under one or more names.
    ///
    /// Missing indexes are created in name order. Nothing is mutated when
    /// the subscriber or any name is invalid.
    pub fn index<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        names: impl Into<Names>,
    ) -> Result<(), SubscribeError> {
        let signature = subscriber.into().signature()?;
        let uid = uid.into();
        let names = names.into();
        names.validate()?;

        for name in names.iter() {
            let index = self.indexes.entry(name.to_string()).or_insert_with(|| {
                debug!(relationship = name, "created subscription index");
                SubscriptionIndex::new(name)
            });
            index.insert(signature.clone(), uid.clone());
        }
        Ok(())
    }

    /// Remove a relationship under one or more names, with its metadata.
    ///
    /// Names without an index are skipped; no index is ever created here.
    pub fn unindex<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        names: impl Into<Names>,
    ) -> Result<(), SubscribeError> {
        let signature = subscriber.into().signature()?;
        let uid = uid.into();

        for name in names.into().iter() {
            if let Some(index) = self.indexes.get_mut(name) {
                index.remove(&signature, &uid);
            }
            self.metadata
                .remove(&(signature.clone(), uid.clone(), name.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Search the catalog. See the module docs for the query semantics.
    pub fn search<'a>(&self, query: impl Into<Query<'a>>) -> Result<SearchResults, SubscribeError> {
        let hits: BTreeSet<Hit> = match query.into() {
            Query::Subscriber(subscriber) => {
                let signature = subscriber.signature()?;
                trace!(%signature, "unnamed search for items");
                self.indexes
                    .values()
                    .flat_map(|index| index.uids_of(&signature))
                    .cloned()
                    .map(Hit::Item)
                    .collect()
            }
            Query::Uid(uid) => {
                trace!(%uid, "unnamed search for subscribers");
                self.indexes
                    .values()
                    .flat_map(|index| index.signatures_of(&uid))
                    .cloned()
                    .map(Hit::Subscriber)
                    .collect()
            }
            Query::Named(criteria) => self.search_named(criteria)?,
        };
        Ok(SearchResults::from(hits))
    }

    fn search_named(
        &self,
        criteria: BTreeMap<String, Criterion<'_>>,
    ) -> Result<BTreeSet<Hit>, SubscribeError> {
        // Normalize every criterion first so a malformed query fails the
        // same way whichever indexes happen to exist.
        let lookups = criteria
            .into_iter()
            .map(|(name, criterion)| {
                let lookup = match criterion {
                    Criterion::Subscriber(subscriber) => Lookup::ItemsOf(subscriber.signature()?),
                    Criterion::Uid(uid) => Lookup::SubscribersOf(uid),
                };
                Ok((name, lookup))
            })
            .collect::<Result<Vec<_>, SubscribeError>>()?;

        let mut result: Option<BTreeSet<Hit>> = None;
        for (name, lookup) in &lookups {
            let Some(index) = self.indexes.get(name) else {
                trace!(relationship = %name, "ignoring unknown relationship name");
                continue;
            };
            let hits: BTreeSet<Hit> = match lookup {
                Lookup::ItemsOf(signature) => {
                    index.uids_of(signature).cloned().map(Hit::Item).collect()
                }
                Lookup::SubscribersOf(uid) => index
                    .signatures_of(uid)
                    .cloned()
                    .map(Hit::Subscriber)
                    .collect(),
            };
            result = Some(match result {
                None => hits,
                Some(acc) => acc.intersection(&hits).cloned().collect(),
            });
        }
        Ok(result.unwrap_or_default())
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Resolve an item through the injected resolver.
    pub fn get_item(&self, uid: impl Into<ItemUid>) -> Option<R::Item>
    where
        R: ItemResolver,
    {
        self.resolver.resolve(&uid.into())
    }

    /// Look up a subscriber record through the injected store.
    pub fn get_subscriber(&self, signature: &Signature) -> Option<S::Subscriber>
    where
        S: SubscriberStore,
    {
        self.subscribers.lookup(signature)
    }

    /// The injected subscriber store.
    pub fn subscribers(&self) -> &S {
        &self.subscribers
    }

    /// Mutable access to the injected subscriber store.
    pub fn subscribers_mut(&mut self) -> &mut S {
        &mut self.subscribers
    }

    // =========================================================================
    // REGISTRY
    // =========================================================================

    /// The index registered under `name`, if any.
    pub fn get_index(&self, name: &str) -> Option<&SubscriptionIndex> {
        self.indexes.get(name)
    }

    /// Whether an index exists under `name`, empty or not.
    pub fn contains_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// Registered relationship names in sorted order.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Every index in name order.
    pub fn indexes(&self) -> impl Iterator<Item = &SubscriptionIndex> {
        self.indexes.values()
    }

    /// Number of registered indexes.
    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    // =========================================================================
    // EDGE METADATA
    // =========================================================================

    /// Store metadata for the `(subscriber, uid, name)` edge, replacing any.
    pub fn set_metadata<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        name: &str,
        metadata: Metadata,
    ) -> Result<(), SubscribeError> {
        if name.is_empty() {
            return Err(SubscribeError::InvalidName);
        }
        let signature = subscriber.into().signature()?;
        self.metadata
            .insert((signature, uid.into(), name.to_string()), metadata);
        Ok(())
    }

    /// Metadata stored for the `(subscriber, uid, name)` edge.
    pub fn metadata<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        name: &str,
    ) -> Result<Option<&Metadata>, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self
            .metadata
            .get(&(signature, uid.into(), name.to_string())))
    }

    /// Drop and return the metadata for one edge.
    pub fn remove_metadata<'a>(
        &mut self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        name: &str,
    ) -> Result<Option<Metadata>, SubscribeError> {
        let signature = subscriber.into().signature()?;
        Ok(self
            .metadata
            .remove(&(signature, uid.into(), name.to_string())))
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Capture indexes and metadata in deterministic order.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            indexes: self
                .indexes
                .iter()
                .map(|(name, index)| IndexSnapshot {
                    name: name.clone(),
                    edges: index
                        .edges()
                        .map(|(signature, uid)| (signature.clone(), uid.clone()))
                        .collect(),
                })
                .collect(),
            metadata: self
                .metadata
                .iter()
                .map(|((signature, uid, name), metadata)| MetadataEntry {
                    signature: signature.clone(),
                    uid: uid.clone(),
                    name: name.clone(),
                    metadata: metadata.clone(),
                })
                .collect(),
        }
    }

    /// Replace indexes and metadata with the contents of a snapshot.
    ///
    /// The snapshot is checked in full before anything is replaced. A name
    /// or metadata edge listed twice is rejected rather than merged.
    pub fn restore(&mut self, snapshot: CatalogSnapshot) -> Result<(), SubscribeError> {
        let mut indexes = BTreeMap::new();
        for IndexSnapshot { name, edges } in snapshot.indexes {
            if name.is_empty() {
                return Err(SubscribeError::InvalidName);
            }
            if indexes.contains_key(&name) {
                return Err(SubscribeError::DeserializationError(format!(
                    "duplicate index '{}' in snapshot",
                    name
                )));
            }
            let mut index = SubscriptionIndex::new(name.as_str());
            for (signature, uid) in edges {
                index.insert(signature, uid);
            }
            indexes.insert(name, index);
        }

        let mut metadata = BTreeMap::new();
        for entry in snapshot.metadata {
            if entry.name.is_empty() {
                return Err(SubscribeError::InvalidName);
            }
            let key = (entry.signature, entry.uid, entry.name);
            if metadata.contains_key(&key) {
                return Err(SubscribeError::DeserializationError(format!(
                    "duplicate metadata for ({}, {}, {}) in snapshot",
                    key.0, key.1, key.2
                )));
            }
            metadata.insert(key, entry.metadata);
        }

        debug!(
            indexes = indexes.len(),
            metadata = metadata.len(),
            "restored catalog snapshot"
        );
        self.indexes = indexes;
        self.metadata = metadata;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
