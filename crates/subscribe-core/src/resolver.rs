//! # Resolution Capabilities
//!
//! The catalog indexes identifiers only. Turning a UID into an item, or a
//! signature into a subscriber record, is delegated to capabilities injected
//! when the catalog is constructed.
//!
//! Closures work as capabilities directly:
//!
//! ```
//! use subscribe_core::{ItemUid, SubscriptionCatalog, SubscribersContainer};
//!
//! let resolver = |uid: &ItemUid| (uid.as_str() == "U1").then(|| "front page".to_string());
//! let catalog = SubscriptionCatalog::with_capabilities(resolver, SubscribersContainer::new());
//! assert_eq!(catalog.get_item("U1"), Some("front page".to_string()));
//! assert_eq!(catalog.get_item("U2"), None);
//! ```

use crate::{ItemUid, Signature};
use std::convert::Infallible;

/// Resolves an item UID to the item it names.
pub trait ItemResolver {
    type Item;

    /// Return the item for `uid`, or `None` when it does not exist.
    fn resolve(&self, uid: &ItemUid) -> Option<Self::Item>;
}

impl<F, T> ItemResolver for F
where
    F: Fn(&ItemUid) -> Option<T>,
{
    type Item = T;

    fn resolve(&self, uid: &ItemUid) -> Option<T> {
        self(uid)
    }
}

/// Looks up stored subscriber records by signature.
pub trait SubscriberStore {
    type Subscriber;

    /// Return the subscriber stored under `signature`, or `None`.
    fn lookup(&self, signature: &Signature) -> Option<Self::Subscriber>;
}

impl<F, T> SubscriberStore for F
where
    F: Fn(&Signature) -> Option<T>,
{
    type Subscriber = T;

    fn lookup(&self, signature: &Signature) -> Option<T> {
        self(signature)
    }
}

/// Capability that never resolves anything.
///
/// Default item resolver for catalogs that only need the index surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl ItemResolver for Unresolved {
    type Item = Infallible;

    fn resolve(&self, _uid: &ItemUid) -> Option<Infallible> {
        None
    }
}

impl SubscriberStore for Unresolved {
    type Subscriber = Infallible;

    fn lookup(&self, _signature: &Signature) -> Option<Infallible> {
        None
    }
}
