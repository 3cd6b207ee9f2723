//! Plain-data image of a catalog.
//!
//! Produced by `SubscriptionCatalog::snapshot` and consumed by
//! `SubscriptionCatalog::restore`. Every list is sorted, so two catalogs with
//! the same contents produce identical snapshots.

use crate::{ItemUid, Metadata, Signature, SubscribeError};
use serde::{Deserialize, Serialize};

/// Every edge of one named index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    /// `(subscriber, item)` pairs in signature order.
    pub edges: Vec<(Signature, ItemUid)>,
}

/// Metadata attached to one `(subscriber, item, name)` edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub signature: Signature,
    pub uid: ItemUid,
    pub name: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub indexes: Vec<IndexSnapshot>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CatalogSnapshot {
    /// Total number of edges across all indexes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.indexes.iter().map(|index| index.edges.len()).sum()
    }

    /// Pretty-printed JSON export.
    pub fn to_json(&self) -> Result<String, SubscribeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SubscribeError::SerializationError(e.to_string()))
    }

    /// Parse a JSON export. Signatures are validated while decoding.
    pub fn from_json(text: &str) -> Result<Self, SubscribeError> {
        serde_json::from_str(text).map_err(|e| SubscribeError::DeserializationError(e.to_string()))
    }
}
