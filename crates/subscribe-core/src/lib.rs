//! # subscribe-core
//!
//! In-memory catalog of subscriber/item relationships.
//!
//! Each relationship name ("like", "love", "invited", ...) owns one
//! [`SubscriptionIndex`], a two-way mapping between item UIDs and subscriber
//! [`Signature`]s. A [`SubscriptionCatalog`] groups the indexes and answers:
//! - which items is this subscriber related to, under any name?
//! - which subscribers are related to this item, under any name?
//! - which items (or subscribers) satisfy every named criterion at once?
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no file I/O; the app layer owns files
//! - Deterministic: results come back deduplicated in sorted order
//! - Items and subscriber records are resolved through injected
//!   capabilities, never stored here

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod formats;
pub mod index;
pub mod keys;
pub mod primitives;
pub mod query;
pub mod resolver;
pub mod shared;
pub mod signature;
pub mod subscriber;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use signature::{Signature, Subscriber, SubscriberRef};
pub use types::{ItemUid, Metadata, SubscribeError};

// =============================================================================
// RE-EXPORTS: Catalog
// =============================================================================

pub use catalog::SubscriptionCatalog;
pub use index::SubscriptionIndex;
pub use keys::{SubscriptionKey, SubscriptionKeys};
pub use query::{Criterion, Hit, Names, Query, SearchResults};
pub use resolver::{ItemResolver, SubscriberStore, Unresolved};
pub use shared::SharedCatalog;
pub use subscriber::{ItemSubscriber, SubscribersContainer};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{
    CatalogSnapshot, IndexSnapshot, MetadataEntry, PersistenceHeader, snapshot_from_bytes,
    snapshot_to_bytes,
};
