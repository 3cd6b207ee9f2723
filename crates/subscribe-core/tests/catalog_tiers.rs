//! # Catalog Tier Tests (T0-T3)
//!
//! ## Tiers
//! - T0: Signature Integrity
//! - T1: Two-Way Indexing
//! - T2: Unnamed Search (union)
//! - T3: Named Search (intersection)

use subscribe_core::{
    ItemSubscriber, ItemUid, Query, Signature, SubscribeError, Subscriber, SubscriptionCatalog,
};

fn sig(namespace: &str, identifier: &str) -> Signature {
    Signature::new(namespace, identifier).expect("valid signature")
}

// =============================================================================
// TIER T0: SIGNATURE INTEGRITY
// =============================================================================

mod t0_signature_integrity {
    use super::*;

    /// T0.1: Every accepted shape normalizes to the same key.
    #[test]
    fn shapes_agree() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("tuple");
        catalog.index(sig("member", "Ford"), "U2", "like").expect("signature");
        catalog
            .index(&ItemSubscriber::member("Ford"), "U3", "like")
            .expect("record");
        catalog
            .index(vec!["member".to_string(), "Ford".to_string()], "U4", "like")
            .expect("raw parts");

        let index = catalog.get_index("like").expect("like");
        assert_eq!(index.item_uids_for(("member", "Ford")).expect("lookup").len(), 4);
    }

    /// T0.2: Malformed signatures are rejected with no index created.
    #[test]
    fn malformed_rejected() {
        let mut catalog = SubscriptionCatalog::new();
        let one = vec!["member".to_string()];
        assert!(matches!(
            catalog.index(one, "U1", "like"),
            Err(SubscribeError::InvalidSignature(_))
        ));
        assert!(matches!(
            catalog.index(&ItemSubscriber::default(), "U1", "like"),
            Err(SubscribeError::InvalidSubscriber(_))
        ));
        assert_eq!(catalog.index_count(), 0);
    }

    /// T0.3: Email-only records sign into the email namespace.
    #[test]
    fn email_subscriber() {
        let record = ItemSubscriber::with_email("me@example.com").in_namespace("ignored");
        assert_eq!(
            record.signature().expect("sig"),
            sig("email", "me@example.com")
        );
    }
}

// =============================================================================
// TIER T1: TWO-WAY INDEXING
// =============================================================================

mod t1_two_way_indexing {
    use super::*;

    /// T1.1: A pair is visible from both directions after indexing.
    #[test]
    fn symmetric_after_index() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");

        let index = catalog.get_index("like").expect("like");
        assert_eq!(index.subscribers_for("U1"), vec![sig("member", "Ford")]);
        assert_eq!(
            index.item_uids_for(("member", "Ford")).expect("lookup"),
            vec![ItemUid::new("U1")]
        );
    }

    /// T1.2: Unindexing restores the prior state exactly.
    #[test]
    fn unindex_reverses_index() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "GM"), "U2", "like").expect("index");
        let before = catalog.snapshot();

        catalog.index(("member", "Ford"), "U1", "like").expect("index");
        catalog.unindex(("member", "Ford"), "U1", "like").expect("unindex");
        assert_eq!(catalog.snapshot(), before);
    }

    /// T1.3: Indexes persist once created, even when emptied.
    #[test]
    fn emptied_index_survives() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");
        catalog.unindex(("member", "Ford"), "U1", "like").expect("unindex");

        assert!(catalog.contains_index("like"));
        assert!(catalog.get_index("like").expect("like").is_empty());
    }
}

// =============================================================================
// TIER T2: UNNAMED SEARCH
// =============================================================================

mod t2_unnamed_search {
    use super::*;

    /// T2.1: Subscribers of an item across every relationship name.
    #[test]
    fn union_over_names() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");
        catalog.index(("member", "Toyota"), "U1", "love").expect("index");
        catalog.index(("member", "GM"), "U2", "like").expect("index");

        let results = catalog.search("U1").expect("search");
        let signatures: Vec<_> = results.signatures().cloned().collect();
        assert_eq!(
            signatures,
            vec![sig("member", "Ford"), sig("member", "Toyota")]
        );
        assert_eq!(results.item_uids().count(), 0);
    }

    /// T2.2: Unknown item or subscriber yields empty, not an error.
    #[test]
    fn not_found_is_empty() {
        let catalog = SubscriptionCatalog::new();
        assert!(catalog.search("nothing").expect("search").is_empty());
        assert!(catalog.search(("member", "nobody")).expect("search").is_empty());
    }
}

// =============================================================================
// TIER T3: NAMED SEARCH
// =============================================================================

mod t3_named_search {
    use super::*;

    /// T3.1: Ford likes U1; Toyota likes and loves U1.
    #[test]
    fn ford_and_toyota() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");
        catalog
            .index(("member", "Toyota"), "U1", ["like", "love"])
            .expect("index");

        let love = catalog.search(Query::named([("love", "U1")])).expect("search");
        assert_eq!(love.signatures().cloned().collect::<Vec<_>>(), vec![sig("member", "Toyota")]);

        let like_and_love = catalog
            .search(Query::named([("like", "U1"), ("love", "U1")]))
            .expect("search");
        assert_eq!(like_and_love, love);

        let all = catalog.search("U1").expect("search");
        assert_eq!(all.len(), 2);

        let ford_loves = catalog
            .search(Query::named([("love", ("member", "Ford"))]))
            .expect("search");
        assert!(ford_loves.is_empty());
        let ford_likes = catalog
            .search(Query::named([("like", ("member", "Ford"))]))
            .expect("search");
        assert_eq!(ford_likes.item_uids().collect::<Vec<_>>(), vec![&ItemUid::new("U1")]);

        catalog
            .unindex(("member", "Toyota"), "U1", "love")
            .expect("unindex");
        let ford_loves = catalog
            .search(Query::named([("love", ("member", "Ford"))]))
            .expect("search");
        assert!(ford_loves.is_empty());
        let like = catalog.search(Query::named([("like", "U1")])).expect("search");
        assert!(like.contains_subscriber(&sig("member", "Ford")));
        assert!(like.contains_subscriber(&sig("member", "Toyota")));
    }

    /// T3.2: No index is a universal set.
    #[test]
    fn no_universal_set() {
        let mut catalog = SubscriptionCatalog::new();
        catalog.index(("member", "Ford"), "U1", "like").expect("index");

        assert!(
            catalog
                .search(Query::named([("unknown", "U1")]))
                .expect("search")
                .is_empty()
        );
    }

    /// T3.3: Queries arriving as JSON behave like typed queries.
    #[test]
    fn json_queries() {
        let mut catalog = SubscriptionCatalog::new();
        catalog
            .index(("member", "Toyota"), "U1", ["like", "love"])
            .expect("index");

        let typed = catalog
            .search(Query::named([("like", ("member", "Toyota"))]))
            .expect("search");
        let parsed = catalog
            .search(Query::parse(r#"{"like": ["member", "Toyota"]}"#).expect("parse"))
            .expect("search");
        assert_eq!(typed, parsed);
        assert!(parsed.contains_item("U1"));

        assert!(matches!(
            Query::parse("42"),
            Err(SubscribeError::InvalidQuery(_))
        ));
    }
}
