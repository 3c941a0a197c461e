// src/tests/journal_store.rs
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::journal_store::JournalStore;
use crate::tests::test_utils::{served, unmatched, urls};

fn capacity(n: usize) -> Option<NonZeroUsize> {
    NonZeroUsize::new(n)
}

#[test]
fn snapshot_preserves_insertion_order() {
    let store = JournalStore::unbounded();
    for url in ["/a", "/b", "/c"] {
        store.append(Arc::new(unmatched(url)));
    }

    assert_eq!(urls(&store.snapshot()), vec!["/a", "/b", "/c"]);
    assert_eq!(store.len(), 3);
}

#[test]
fn snapshot_is_unaffected_by_later_appends() {
    let store = JournalStore::unbounded();
    store.append(Arc::new(unmatched("/first")));

    let before = store.snapshot();
    store.append(Arc::new(unmatched("/second")));

    assert_eq!(urls(&before), vec!["/first"]);
    assert_eq!(store.len(), 2);
}

#[test]
fn bounded_store_evicts_oldest_first() {
    let store = JournalStore::with_capacity(capacity(3));
    let mut evicted = 0;
    for i in 0..5 {
        evicted += store.append(Arc::new(unmatched(&format!("/{i}"))));
    }

    assert_eq!(evicted, 2);
    assert_eq!(urls(&store.snapshot()), vec!["/2", "/3", "/4"]);
}

#[test]
fn evicted_ids_are_absent_not_errors() {
    let store = JournalStore::with_capacity(capacity(1));
    let first = Arc::new(unmatched("/old"));
    let first_id = first.id;
    store.append(first);
    store.append(Arc::new(unmatched("/new")));

    assert!(store.get(first_id).is_none());
    assert!(store.get(Uuid::new_v4()).is_none());
}

#[test]
fn get_returns_the_stored_event() {
    let store = JournalStore::unbounded();
    let event = Arc::new(served("/x", json!({})));
    let id = event.id;
    store.append(Arc::clone(&event));

    let found = store.get(id).expect("event should be present");
    assert!(Arc::ptr_eq(&found, &event));
}

#[test]
fn remove_where_removes_exactly_the_matches() {
    let store = JournalStore::unbounded();
    for url in ["/keep", "/drop", "/keep", "/drop"] {
        store.append(Arc::new(unmatched(url)));
    }

    let removed = store.remove_where(|e| e.request.url == "/drop");
    assert_eq!(urls(&removed), vec!["/drop", "/drop"]);
    assert_eq!(urls(&store.snapshot()), vec!["/keep", "/keep"]);

    let again = store.remove_where(|e| e.request.url == "/drop");
    assert!(again.is_empty());
}

#[test]
fn clear_empties_the_store() {
    let store = JournalStore::unbounded();
    store.append(Arc::new(unmatched("/a")));
    store.append(Arc::new(unmatched("/b")));

    assert_eq!(store.clear(), 2);
    assert!(store.is_empty());
}

#[test]
fn concurrent_appends_lose_nothing() {
    let store = JournalStore::unbounded();
    let threads = 8;
    let per_thread = 250;

    std::thread::scope(|scope| {
        for t in 0..threads {
            let store = &store;
            scope.spawn(move || {
                for i in 0..per_thread {
                    store.append(Arc::new(unmatched(&format!("/{t}/{i}"))));
                }
            });
        }
    });

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), threads * per_thread);

    let ids: HashSet<_> = snapshot.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), snapshot.len(), "no duplicate events");

    // Each writer's own events keep their relative order.
    for t in 0..threads {
        let prefix = format!("/{t}/");
        let own: Vec<usize> = snapshot
            .iter()
            .filter_map(|e| e.request.url.strip_prefix(prefix.as_str()))
            .map(|i| i.parse().unwrap())
            .collect();
        assert_eq!(own, (0..per_thread).collect::<Vec<_>>());
    }
}

#[test]
fn concurrent_readers_never_see_more_than_capacity() {
    let limit = 16;
    let store = JournalStore::with_capacity(capacity(limit));

    std::thread::scope(|scope| {
        for t in 0..4 {
            let store = &store;
            scope.spawn(move || {
                for i in 0..500 {
                    store.append(Arc::new(unmatched(&format!("/{t}/{i}"))));
                }
            });
        }
        let store = &store;
        scope.spawn(move || {
            for _ in 0..500 {
                assert!(store.snapshot().len() <= limit);
                store.remove_where(|e| e.request.url.ends_with("/7"));
            }
        });
    });

    assert!(store.len() <= limit);
}

#[test]
fn panicking_predicate_leaves_order_intact() {
    let store = JournalStore::unbounded();
    for url in ["/a", "/b", "/c", "/d"] {
        store.append(Arc::new(unmatched(url)));
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.remove_where(|e| {
            if e.request.url == "/d" {
                panic!("predicate blew up");
            }
            e.request.url == "/b"
        })
    }));
    assert!(outcome.is_err());

    store.append(Arc::new(unmatched("/e")));
    assert_eq!(urls(&store.snapshot()), vec!["/a", "/b", "/c", "/d", "/e"]);
}

#[test]
fn predicate_runs_without_blocking_appends() {
    let store = JournalStore::unbounded();
    store.append(Arc::new(unmatched("/a")));
    store.append(Arc::new(unmatched("/b")));

    // Appending from inside the predicate would deadlock if the write lock were held.
    let removed = store.remove_where(|e| {
        if e.request.url == "/a" {
            store.append(Arc::new(unmatched("/late")));
        }
        e.request.url == "/b"
    });

    assert_eq!(urls(&removed), vec!["/b"]);
    assert_eq!(urls(&store.snapshot()), vec!["/a", "/late"]);
}
