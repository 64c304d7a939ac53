//! Integration tests for the in-memory store
//!
//! Tests node lifecycle, edge deletion, and snapshot traversal.

use std::sync::Arc;
use std::thread;

use edgemap_foundation::{Attributes, ErrorKind, Label};
use edgemap_store::{Direction, GraphStore, MemoryStore};

// =============================================================================
// Node Lifecycle
// =============================================================================

#[test]
fn deleted_node_is_gone() {
    let store = MemoryStore::new();
    let n = store.create_node(&Label::new("A"), &Attributes::new()).unwrap();

    store.delete_node(n).unwrap();

    assert!(!store.contains_node(n));
    let err = store.node_type(n).unwrap_err();
    assert!(err.is_store_error());
    assert_eq!(store.node_count().unwrap(), 0);
}

#[test]
fn slot_reuse_invalidates_old_ids() {
    let store = MemoryStore::new();
    let ty = Label::new("A");
    let old = store.create_node(&ty, &Attributes::new()).unwrap();
    store.delete_node(old).unwrap();
    let new = store.create_node(&ty, &Attributes::new()).unwrap();

    assert_ne!(old, new);
    assert!(store.contains_node(new));
    assert!(matches!(
        store.properties(old).unwrap_err().kind,
        ErrorKind::StaleNode(_)
    ));
}

#[test]
fn delete_node_removes_incident_edges() {
    let store = MemoryStore::new();
    let ty = Label::new("A");
    let edge = Label::new("E");
    let a = store.create_node(&ty, &Attributes::new()).unwrap();
    let b = store.create_node(&ty, &Attributes::new()).unwrap();
    store.create_edge(a, &edge, Direction::Outgoing, b).unwrap();
    store.create_edge(b, &edge, Direction::Outgoing, a).unwrap();

    store.delete_node(b).unwrap();

    assert_eq!(store.edge_count().unwrap(), 0);
    assert_eq!(store.traverse(a, &edge, Direction::Both).unwrap().count(), 0);
}

// =============================================================================
// Edges
// =============================================================================

#[test]
fn edge_lookup_and_delete() {
    let store = MemoryStore::new();
    let ty = Label::new("A");
    let a = store.create_node(&ty, &Attributes::new()).unwrap();
    let b = store.create_node(&ty, &Attributes::new()).unwrap();
    let e = store
        .create_edge(a, &Label::new("E"), Direction::Incoming, b)
        .unwrap();

    assert_eq!(store.edge(e.id).unwrap(), e);
    assert_eq!((e.start, e.end), (b, a));

    store.delete_edge(e.id).unwrap();
    assert!(matches!(
        store.edge(e.id).unwrap_err().kind,
        ErrorKind::EdgeNotFound(_)
    ));
    assert!(store.delete_edge(e.id).unwrap_err().is_store_error());
}

#[test]
fn traversal_of_missing_node_fails() {
    let store = MemoryStore::new();
    let n = store.create_node(&Label::new("A"), &Attributes::new()).unwrap();
    store.delete_node(n).unwrap();

    assert!(store.traverse(n, &Label::new("E"), Direction::Outgoing).is_err());
}

#[test]
fn traversal_sees_snapshot_from_start() {
    let store = MemoryStore::new();
    let ty = Label::new("A");
    let edge = Label::new("E");
    let a = store.create_node(&ty, &Attributes::new()).unwrap();
    let b = store.create_node(&ty, &Attributes::new()).unwrap();
    store.create_edge(a, &edge, Direction::Outgoing, b).unwrap();

    let mut steps = store.traverse(a, &edge, Direction::Outgoing).unwrap();
    store.create_edge(a, &edge, Direction::Outgoing, b).unwrap();

    assert!(steps.next().is_some());
    assert!(steps.next().is_none());
    assert_eq!(store.traverse(a, &edge, Direction::Outgoing).unwrap().count(), 2);
}

// =============================================================================
// Sharing
// =============================================================================

#[test]
fn concurrent_appends_are_all_kept() {
    let store = Arc::new(MemoryStore::new());
    let ty = Label::new("A");
    let edge = Label::new("E");
    let hub = store.create_node(&ty, &Attributes::new()).unwrap();
    let leaf = store.create_node(&ty, &Attributes::new()).unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..25 {
                    store.create_edge(hub, &edge, Direction::Outgoing, leaf).unwrap();
                }
            });
        }
    });

    assert_eq!(store.edge_count().unwrap(), 100);
}

// =============================================================================
// Transactions
// =============================================================================

#[test]
fn rollback_keeps_other_threads_writes() {
    let store = MemoryStore::new();
    let ty = Label::new("A");
    let edge = Label::new("E");
    let hub = store.create_node(&ty, &Attributes::new()).unwrap();

    let mut theirs = None;
    let result: edgemap_foundation::Result<()> = store.atomically(|| {
        store.create_node(&ty, &Attributes::new())?;
        theirs = thread::scope(|s| {
            s.spawn(|| {
                let node = store.create_node(&Label::new("Theirs"), &Attributes::new())?;
                store.create_edge(hub, &edge, Direction::Outgoing, node)?;
                Ok::<_, edgemap_foundation::Error>(node)
            })
            .join()
            .ok()
        });
        Err(edgemap_foundation::Error::store("boom"))
    });
    assert!(result.is_err());

    let theirs = theirs.unwrap().unwrap();
    assert!(store.contains_node(theirs));
    assert_eq!(store.node_type(theirs).unwrap(), Label::new("Theirs"));
    assert_eq!(store.traverse(hub, &edge, Direction::Outgoing).unwrap().count(), 1);
    assert_eq!(store.node_count().unwrap(), 2);

    // Identities handed out before the rollback are never reissued
    let next = store.create_node(&Label::new("Other"), &Attributes::new()).unwrap();
    assert_ne!(next, theirs);
    assert_eq!(store.node_type(theirs).unwrap(), Label::new("Theirs"));
}
