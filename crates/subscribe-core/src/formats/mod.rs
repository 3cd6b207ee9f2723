//! # Formats
//!
//! Serialized forms of a catalog:
//! - `snapshot`: the plain-data `CatalogSnapshot` and its JSON export
//! - `persistence`: header + postcard binary encoding
//!
//! File I/O lives in the app layer; everything here is a pure transformation.

mod persistence;
mod snapshot;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, snapshot_from_bytes, snapshot_to_bytes,
};
pub use snapshot::{CatalogSnapshot, IndexSnapshot, MetadataEntry};
