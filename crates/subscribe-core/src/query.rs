//! # Query Module
//!
//! Structured query types for catalog search.
//!
//! The accepted shapes are explicit tagged unions:
//! - `Query::Subscriber`: everything a subscriber is related to, any name
//! - `Query::Uid`: every subscriber related to an item, any name
//! - `Query::Named`: per relationship name, a criterion; results intersect
//!
//! ## JSON shape
//!
//! External callers speak a small JSON protocol ([`Query::from_json`]):
//! a string is a UID, a two-string array is a signature, and an object maps
//! relationship names to either of those.

use crate::signature::{Signature, Subscriber, SubscriberRef};
use crate::subscriber::ItemSubscriber;
use crate::{ItemUid, SubscribeError};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RELATIONSHIP NAMES
// =============================================================================

/// One relationship name or an ordered collection of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Names(Vec<String>);

impl Names {
    /// Names in the order given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of names, repeats included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no name was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject empty names.
    pub fn validate(&self) -> Result<(), SubscribeError> {
        if self.0.iter().any(String::is_empty) {
            return Err(SubscribeError::InvalidName);
        }
        Ok(())
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for Names {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| (*n).to_string()).collect())
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[String]> for Names {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

// =============================================================================
// CRITERION
// =============================================================================

/// Per-name criterion of a named query.
///
/// A subscriber criterion asks for item UIDs; a UID criterion asks for
/// subscriber signatures.
#[derive(Debug, Clone)]
pub enum Criterion<'a> {
    Subscriber(SubscriberRef<'a>),
    Uid(ItemUid),
}

impl From<&str> for Criterion<'_> {
    fn from(uid: &str) -> Self {
        Self::Uid(ItemUid::new(uid))
    }
}

impl From<String> for Criterion<'_> {
    fn from(uid: String) -> Self {
        Self::Uid(ItemUid::from(uid))
    }
}

impl From<ItemUid> for Criterion<'_> {
    fn from(uid: ItemUid) -> Self {
        Self::Uid(uid)
    }
}

impl From<&ItemUid> for Criterion<'_> {
    fn from(uid: &ItemUid) -> Self {
        Self::Uid(uid.clone())
    }
}

impl<'a> From<SubscriberRef<'a>> for Criterion<'a> {
    fn from(subscriber: SubscriberRef<'a>) -> Self {
        Self::Subscriber(subscriber)
    }
}

impl From<Signature> for Criterion<'_> {
    fn from(signature: Signature) -> Self {
        Self::Subscriber(signature.into())
    }
}

impl From<&Signature> for Criterion<'_> {
    fn from(signature: &Signature) -> Self {
        Self::Subscriber(signature.into())
    }
}

impl From<(&str, &str)> for Criterion<'_> {
    fn from(parts: (&str, &str)) -> Self {
        Self::Subscriber(parts.into())
    }
}

impl<'a> From<&'a ItemSubscriber> for Criterion<'a> {
    fn from(subscriber: &'a ItemSubscriber) -> Self {
        Self::Subscriber(subscriber.into())
    }
}

impl<'a> From<&'a dyn Subscriber> for Criterion<'a> {
    fn from(subscriber: &'a dyn Subscriber) -> Self {
        Self::Subscriber(subscriber.into())
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// A catalog search request.
#[derive(Debug, Clone)]
pub enum Query<'a> {
    /// Items related to a subscriber under any relationship name.
    Subscriber(SubscriberRef<'a>),
    /// Subscribers related to an item under any relationship name.
    Uid(ItemUid),
    /// Intersection over the named relationships that exist.
    Named(BTreeMap<String, Criterion<'a>>),
}

impl<'a> Query<'a> {
    /// Build a named query from `(name, criterion)` pairs.
    ///
    /// A repeated name keeps its last criterion.
    pub fn named<I, K, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<Criterion<'a>>,
    {
        Self::Named(
            pairs
                .into_iter()
                .map(|(name, criterion)| (name.into(), criterion.into()))
                .collect(),
        )
    }
}

impl Query<'static> {
    /// Decode a query from its JSON shape.
    pub fn from_json(value: &Value) -> Result<Self, SubscribeError> {
        match value {
            Value::String(uid) => Ok(Self::Uid(ItemUid::new(uid.as_str()))),
            Value::Array(parts) => Ok(Self::Subscriber(signature_from_json(parts)?.into())),
            Value::Object(entries) => {
                let mut criteria = BTreeMap::new();
                for (name, criterion) in entries {
                    criteria.insert(name.clone(), criterion_from_json(criterion)?);
                }
                Ok(Self::Named(criteria))
            }
            other => Err(SubscribeError::InvalidQuery(format!(
                "unsupported query shape: {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse JSON text and decode it as a query.
    pub fn parse(text: &str) -> Result<Self, SubscribeError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SubscribeError::InvalidQuery(format!("malformed JSON: {}", e)))?;
        Self::from_json(&value)
    }
}

fn criterion_from_json(value: &Value) -> Result<Criterion<'static>, SubscribeError> {
    match value {
        Value::String(uid) => Ok(Criterion::Uid(ItemUid::new(uid.as_str()))),
        Value::Array(parts) => Ok(Criterion::Subscriber(signature_from_json(parts)?.into())),
        other => Err(SubscribeError::InvalidQuery(format!(
            "unsupported criterion shape: {}",
            json_kind(other)
        ))),
    }
}

fn signature_from_json(parts: &[Value]) -> Result<Signature, SubscribeError> {
    let parts = parts
        .iter()
        .map(|part| {
            part.as_str().map(str::to_string).ok_or_else(|| {
                SubscribeError::InvalidSignature("signature elements must be strings".to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Signature::try_from(parts)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for Query<'_> {
    fn from(uid: &str) -> Self {
        Self::Uid(ItemUid::new(uid))
    }
}

impl From<ItemUid> for Query<'_> {
    fn from(uid: ItemUid) -> Self {
        Self::Uid(uid)
    }
}

impl<'a> From<SubscriberRef<'a>> for Query<'a> {
    fn from(subscriber: SubscriberRef<'a>) -> Self {
        Self::Subscriber(subscriber)
    }
}

impl From<Signature> for Query<'_> {
    fn from(signature: Signature) -> Self {
        Self::Subscriber(signature.into())
    }
}

impl From<&Signature> for Query<'_> {
    fn from(signature: &Signature) -> Self {
        Self::Subscriber(signature.into())
    }
}

impl From<(&str, &str)> for Query<'_> {
    fn from(parts: (&str, &str)) -> Self {
        Self::Subscriber(parts.into())
    }
}

impl<'a> From<&'a ItemSubscriber> for Query<'a> {
    fn from(subscriber: &'a ItemSubscriber) -> Self {
        Self::Subscriber(subscriber.into())
    }
}

impl<'a> From<&'a dyn Subscriber> for Query<'a> {
    fn from(subscriber: &'a dyn Subscriber) -> Self {
        Self::Subscriber(subscriber.into())
    }
}

impl<'a> From<BTreeMap<String, Criterion<'a>>> for Query<'a> {
    fn from(criteria: BTreeMap<String, Criterion<'a>>) -> Self {
        Self::Named(criteria)
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One element of a search result.
///
/// Serializes in the JSON query shape: a UID string or a signature array.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Hit {
    Item(ItemUid),
    Subscriber(Signature),
}

/// Deduplicated search hits in stable sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchResults(Vec<Hit>);

impl SearchResults {
    /// Number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the search found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hits in sorted order.
    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.0.iter()
    }

    /// The item UIDs among the hits.
    pub fn item_uids(&self) -> impl Iterator<Item = &ItemUid> {
        self.0.iter().filter_map(|hit| match hit {
            Hit::Item(uid) => Some(uid),
            Hit::Subscriber(_) => None,
        })
    }

    /// The subscriber signatures among the hits.
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.0.iter().filter_map(|hit| match hit {
            Hit::Subscriber(signature) => Some(signature),
            Hit::Item(_) => None,
        })
    }

    /// Whether `uid` is among the hits.
    pub fn contains_item(&self, uid: impl Into<ItemUid>) -> bool {
        self.0.binary_search(&Hit::Item(uid.into())).is_ok()
    }

    /// Whether `signature` is among the hits.
    pub fn contains_subscriber(&self, signature: &Signature) -> bool {
        self.0
            .binary_search(&Hit::Subscriber(signature.clone()))
            .is_ok()
    }

    /// The sorted hits.
    #[must_use]
    pub fn into_vec(self) -> Vec<Hit> {
        self.0
    }
}

impl From<BTreeSet<Hit>> for SearchResults {
    fn from(hits: BTreeSet<Hit>) -> Self {
        Self(hits.into_iter().collect())
    }
}

impl IntoIterator for SearchResults {
    type Item = Hit;
    type IntoIter = std::vec::IntoIter<Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_from_single_and_many() {
        let one = Names::from("like");
        assert_eq!(one.iter().collect::<Vec<_>>(), vec!["like"]);

        let many = Names::from(["like", "love"]);
        assert_eq!(many.iter().collect::<Vec<_>>(), vec!["like", "love"]);
        assert_eq!(many.len(), 2);

        assert!(matches!(
            Names::from(vec!["like", ""]).validate(),
            Err(SubscribeError::InvalidName)
        ));
    }

    #[test]
    fn json_string_is_uid() {
        let query = Query::from_json(&json!("U1")).expect("query");
        assert!(matches!(query, Query::Uid(uid) if uid.as_str() == "U1"));
    }

    #[test]
    fn json_array_is_signature() {
        let query = Query::from_json(&json!(["member", "Ford"])).expect("query");
        let Query::Subscriber(subscriber) = query else {
            unreachable!("array decodes to a subscriber query");
        };
        assert_eq!(
            subscriber.signature().expect("sig"),
            Signature::new("member", "Ford").expect("sig")
        );
    }

    #[test]
    fn json_object_is_named() {
        let query =
            Query::from_json(&json!({"like": ["member", "Ford"], "love": "U1"})).expect("query");
        let Query::Named(criteria) = query else {
            unreachable!("object decodes to a named query");
        };
        assert!(matches!(criteria.get("like"), Some(Criterion::Subscriber(_))));
        assert!(matches!(criteria.get("love"), Some(Criterion::Uid(_))));
    }

    #[test]
    fn json_bad_shapes_rejected() {
        for bad in [json!(42), json!(null), json!(true), json!({"like": 7}), json!({"like": {}})] {
            assert!(
                matches!(Query::from_json(&bad), Err(SubscribeError::InvalidQuery(_))),
                "{bad} should be an invalid query"
            );
        }
        for bad in [json!(["member"]), json!(["member", 1]), json!({"like": ["a", "b", "c"]})] {
            assert!(
                matches!(Query::from_json(&bad), Err(SubscribeError::InvalidSignature(_))),
                "{bad} should be an invalid signature"
            );
        }
        assert!(matches!(
            Query::parse("{not json"),
            Err(SubscribeError::InvalidQuery(_))
        ));
    }

    #[test]
    fn named_keeps_last_duplicate() {
        let query = Query::named([("like", "U1"), ("like", "U2")]);
        let Query::Named(criteria) = query else {
            unreachable!("named constructor");
        };
        assert_eq!(criteria.len(), 1);
        assert!(matches!(criteria.get("like"), Some(Criterion::Uid(uid)) if uid.as_str() == "U2"));
    }

    #[test]
    fn results_serialize_in_query_shape() {
        let mut hits = BTreeSet::new();
        hits.insert(Hit::Item(ItemUid::new("U1")));
        hits.insert(Hit::Subscriber(Signature::new("member", "Ford").expect("sig")));
        let results = SearchResults::from(hits);

        assert_eq!(
            serde_json::to_value(&results).expect("serialize"),
            json!(["U1", ["member", "Ford"]])
        );
        assert!(results.contains_item("U1"));
        assert!(results.contains_subscriber(&Signature::new("member", "Ford").expect("sig")));
        assert_eq!(results.item_uids().count(), 1);
        assert_eq!(results.signatures().count(), 1);
    }
}
