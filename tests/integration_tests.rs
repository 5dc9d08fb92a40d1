// Integration tests for Interest Match

use std::collections::HashMap;
use std::sync::Arc;

use interest_match::core::Matcher;
use interest_match::models::{CommitOutcome, PairUniqueness, Pairing};
use interest_match::services::{MatchLedger, MatchService, MemoryLedger, MemoryProfileStore};

async fn build_service(
    profiles: &[(&str, &str)],
    uniqueness: PairUniqueness,
) -> (MatchService, Arc<MemoryProfileStore>, Arc<MemoryLedger>) {
    let store = Arc::new(MemoryProfileStore::new());
    for (name, interests) in profiles {
        let login = name.to_lowercase();
        store
            .add(name, interests, &format!("{}@example.edu", login), &login)
            .await
            .unwrap();
    }

    let ledger = Arc::new(MemoryLedger::new(uniqueness));
    let service = MatchService::new(store.clone(), ledger.clone(), Matcher::new());
    (service, store, ledger)
}

fn membership_counts(pairings: &[Pairing]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for p in pairings {
        *counts.entry(p.member_a.clone()).or_insert(0) += 1;
        *counts.entry(p.member_b.clone()).or_insert(0) += 1;
    }
    counts
}

#[tokio::test]
async fn test_scenario_disjoint_interests() {
    let (service, _, _) = build_service(
        &[("Alice", "chess, music"), ("Bob", "music, chess"), ("Carol", "painting")],
        PairUniqueness::Ordered,
    )
    .await;

    let recs = service.recommend("alice").await.unwrap();

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].name, "Bob");
    assert_eq!(recs[0].email, "bob@example.edu");
}

#[tokio::test]
async fn test_scenario_partial_overlap_ranked_second() {
    let (service, _, _) = build_service(
        &[("Alice", "ai, ml"), ("Bob", "ai, ml"), ("Carol", "ai")],
        PairUniqueness::Ordered,
    )
    .await;

    let recs = service.recommend("alice").await.unwrap();
    let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, vec!["Bob", "Carol"]);
    assert!(recs[0].score > recs[1].score);
    assert!(recs[1].score > 0.0);
}

#[tokio::test]
async fn test_scenario_single_profile() {
    let (service, _, _) = build_service(&[("Alice", "chess")], PairUniqueness::Ordered).await;
    assert!(service.recommend("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scenario_paired_profile_excluded() {
    let (service, _, ledger) = build_service(
        &[
            ("Alice", "chess music"),
            ("Bob", "chess music"),
            ("Carol", "chess music"),
            ("Dave", "chess music"),
        ],
        PairUniqueness::Ordered,
    )
    .await;

    // Dave's request pairs Alice with Bob
    let first = service.request_match("dave").await.unwrap();
    assert_eq!(first.matched, vec!["Alice", "Bob"]);
    assert!(first.committed());

    // Carol ranks Alice and Bob first, but both are already paired
    let second = service.request_match("carol").await.unwrap();
    assert!(!second.matched.contains(&"Bob".to_string()));
    assert_eq!(second.matched, vec!["Dave"]);
    assert!(!second.committed());

    assert_eq!(ledger.pairings().await.unwrap(), vec![Pairing::new("Alice", "Bob")]);
}

#[tokio::test]
async fn test_recommend_properties_hold_for_every_profile() {
    let profiles = [
        ("Ana", "rust, systems, compilers"),
        ("Ben", "compilers, music"),
        ("Cleo", "music, painting, travel"),
        ("Dev", "travel, photography"),
        ("Eli", "rust, music"),
        ("Fay", "gardening"),
        ("Gus", "photography, painting"),
    ];
    let (service, _, _) = build_service(&profiles, PairUniqueness::Ordered).await;

    for (name, _) in &profiles {
        let recs = service.recommend(&name.to_lowercase()).await.unwrap();

        assert!(recs.len() <= 2);
        assert!(recs.iter().all(|r| r.name != *name), "{} recommended to itself", name);
        assert!(recs.iter().all(|r| r.score > 0.0));
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    // Gardening shares nothing with anyone
    assert!(service.recommend("fay").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_request_match_keeps_single_membership() {
    let profiles = [
        ("Ana", "rust, systems"),
        ("Ben", "rust, music"),
        ("Cleo", "music, systems"),
        ("Dev", "rust"),
        ("Eli", "systems, music, rust"),
        ("Fay", "music"),
    ];
    let (service, _, ledger) = build_service(&profiles, PairUniqueness::Ordered).await;

    // Several rounds so earlier pairings get released and replaced
    for _ in 0..3 {
        for (name, _) in &profiles {
            service.request_match(&name.to_lowercase()).await.unwrap();

            let pairings = ledger.pairings().await.unwrap();
            for (member, count) in membership_counts(&pairings) {
                assert_eq!(count, 1, "{} appears in {} pairings", member, count);
            }
            assert!(pairings.iter().all(|p| p.member_a != p.member_b));
        }
    }
}

#[tokio::test]
async fn test_ordered_uniqueness_asymmetry_regression() {
    // Current behavior: the ledger rejects only an identical ordered pair,
    // so a name can end up in two rows through direct commits.
    let (_, _, ledger) = build_service(&[], PairUniqueness::Ordered).await;

    assert_eq!(ledger.commit("Alice", "Bob").await.unwrap(), CommitOutcome::Committed);
    assert_eq!(ledger.commit("Bob", "Alice").await.unwrap(), CommitOutcome::Committed);
    assert_eq!(ledger.commit("Alice", "Bob").await.unwrap(), CommitOutcome::Duplicate);

    let counts = membership_counts(&ledger.pairings().await.unwrap());
    assert_eq!(counts["Alice"], 2);

    // Releasing clears both rows
    assert_eq!(ledger.release("Alice").await.unwrap(), 2);
    assert!(ledger.pairings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unordered_uniqueness_flag() {
    let (_, _, ledger) = build_service(&[], PairUniqueness::Unordered).await;

    assert_eq!(ledger.commit("Alice", "Bob").await.unwrap(), CommitOutcome::Committed);
    assert_eq!(ledger.commit("Bob", "Alice").await.unwrap(), CommitOutcome::Duplicate);
}

#[tokio::test]
async fn test_release_twice_equals_once() {
    let (_, _, ledger) = build_service(&[], PairUniqueness::Ordered).await;
    ledger.commit("Alice", "Bob").await.unwrap();
    ledger.commit("Carol", "Dave").await.unwrap();

    ledger.release("Bob").await.unwrap();
    let once = ledger.pairings().await.unwrap();
    ledger.release("Bob").await.unwrap();
    let twice = ledger.pairings().await.unwrap();

    assert_eq!(once, twice);
    assert!(!ledger.active_names().await.unwrap().contains("Alice"));
}

#[tokio::test]
async fn test_corpus_changes_between_calls() {
    let (service, store, _) = build_service(
        &[("Alice", "chess"), ("Bob", "painting")],
        PairUniqueness::Ordered,
    )
    .await;

    assert!(service.recommend("alice").await.unwrap().is_empty());

    let carol = store.add("Carol", "chess, go", "carol@example.edu", "carol").await.unwrap();
    let recs = service.recommend("alice").await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].name, "Carol");

    store.remove(carol).await;
    assert!(service.recommend("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_never_double_book() {
    let profiles = [
        ("Ana", "rust"),
        ("Ben", "rust"),
        ("Cleo", "rust"),
        ("Dev", "rust"),
        ("Eli", "rust"),
    ];
    let (service, _, ledger) = build_service(&profiles, PairUniqueness::Ordered).await;

    let handles: Vec<_> = profiles
        .iter()
        .map(|(name, _)| {
            let service = service.clone();
            let login = name.to_lowercase();
            tokio::spawn(async move { service.request_match(&login).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for (member, count) in membership_counts(&ledger.pairings().await.unwrap()) {
        assert_eq!(count, 1, "{} double-booked", member);
    }
}
