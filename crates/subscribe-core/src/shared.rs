//! # Shared Catalog
//!
//! A cloneable handle to one catalog behind a single `RwLock`.
//!
//! Multi-name `index`/`unindex` hold the write lock for the whole call, so
//! lazily created indexes and all their edges appear together. Searches hold
//! the read lock, so a search never observes a half-applied mutation.

use crate::formats::CatalogSnapshot;
use crate::query::{Names, Query, SearchResults};
use crate::resolver::{ItemResolver, SubscriberStore, Unresolved};
use crate::signature::{Signature, SubscriberRef};
use crate::subscriber::SubscribersContainer;
use crate::{ItemUid, SubscribeError, SubscriptionCatalog};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Cloneable, thread-safe handle to one [`SubscriptionCatalog`].
pub struct SharedCatalog<R = Unresolved, S = SubscribersContainer> {
    inner: Arc<RwLock<SubscriptionCatalog<R, S>>>,
}

impl<R, S> Clone for SharedCatalog<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedCatalog {
    /// Handle to a fresh, empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::from(SubscriptionCatalog::new())
    }
}

impl Default for SharedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, S> From<SubscriptionCatalog<R, S>> for SharedCatalog<R, S> {
    fn from(catalog: SubscriptionCatalog<R, S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }
}

impl<R, S> SharedCatalog<R, S> {
    /// [`SubscriptionCatalog::index`] under the write lock.
    pub fn index<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        names: impl Into<Names>,
    ) -> Result<(), SubscribeError> {
        self.inner.write().index(subscriber, uid, names)
    }

    /// [`SubscriptionCatalog::unindex`] under the write lock.
    pub fn unindex<'a>(
        &self,
        subscriber: impl Into<SubscriberRef<'a>>,
        uid: impl Into<ItemUid>,
        names: impl Into<Names>,
    ) -> Result<(), SubscribeError> {
        self.inner.write().unindex(subscriber, uid, names)
    }

    /// [`SubscriptionCatalog::search`] under the read lock.
    pub fn search<'a>(&self, query: impl Into<Query<'a>>) -> Result<SearchResults, SubscribeError> {
        self.inner.read().search(query)
    }

    /// Resolve an item under the read lock.
    pub fn get_item(&self, uid: impl Into<ItemUid>) -> Option<R::Item>
    where
        R: ItemResolver,
    {
        self.inner.read().get_item(uid)
    }

    /// Look up a subscriber record under the read lock.
    pub fn get_subscriber(&self, signature: &Signature) -> Option<S::Subscriber>
    where
        S: SubscriberStore,
    {
        self.inner.read().get_subscriber(signature)
    }

    /// Consistent snapshot taken under the read lock.
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.inner.read().snapshot()
    }

    /// Replace the contents under the write lock.
    pub fn restore(&self, snapshot: CatalogSnapshot) -> Result<(), SubscribeError> {
        self.inner.write().restore(snapshot)
    }

    /// Hold the read lock across several calls.
    pub fn read(&self) -> RwLockReadGuard<'_, SubscriptionCatalog<R, S>> {
        self.inner.read()
    }

    /// Hold the write lock across several calls.
    pub fn write(&self) -> RwLockWriteGuard<'_, SubscriptionCatalog<R, S>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handles_share_one_catalog() {
        let catalog = SharedCatalog::new();
        let other = catalog.clone();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");

        let results = other.search("U1").expect("search");
        assert!(results.contains_subscriber(&Signature::new("member", "Ford").expect("sig")));
        assert_eq!(other.read().index_count(), 1);
    }

    #[test]
    fn concurrent_writers_and_readers() {
        let catalog = SharedCatalog::new();
        let writers: Vec<_> = (0..4)
            .map(|n| {
                let catalog = catalog.clone();
                thread::spawn(move || {
                    let id = format!("user{}", n);
                    for i in 0..25 {
                        catalog
                            .index(("member", id.as_str()), format!("U{}", i), ["like", "love"])
                            .expect("index");
                    }
                })
            })
            .collect();
        let reader = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    // writers add `like` and `love` in one call, so the two
                    // never disagree under a single read guard
                    let guard = catalog.read();
                    let like = guard
                        .search(Query::named([("like", "U0")]))
                        .expect("search");
                    let both = guard
                        .search(Query::named([("like", "U0"), ("love", "U0")]))
                        .expect("search");
                    assert_eq!(like, both);
                    drop(guard);
                    thread::yield_now();
                }
            })
        };
        for handle in writers {
            handle.join().expect("writer");
        }
        reader.join().expect("reader");

        let guard = catalog.read();
        let like = guard.get_index("like").expect("like");
        assert_eq!(like.edge_count(), 100);
        assert_eq!(like, &{
            let mut love = guard.get_index("love").expect("love").clone();
            love.rename("like");
            love
        });
    }

    #[test]
    fn restore_replaces_contents() {
        let source = SharedCatalog::new();
        source.index(("member", "Ford"), "U1", "like").expect("index");

        let target = SharedCatalog::new();
        target.index(("member", "GM"), "U9", "hate").expect("index");
        target.restore(source.snapshot()).expect("restore");

        assert_eq!(target.snapshot(), source.snapshot());
        assert!(!target.read().contains_index("hate"));
        assert!(target.get_item("U1").is_none());
        assert!(
            target
                .get_subscriber(&Signature::new("member", "Ford").expect("sig"))
                .is_none()
        );
    }
}
