//! Integration tests for has-one relationships
//!
//! Tests get, replace-on-set, transactional replace, and the concurrent
//! replace race.

use std::sync::Barrier;
use std::thread;

use edgemap_foundation::{Attributes, ErrorKind};
use edgemap_mapping::{MappingConfig, Mapper, Node, One, RelKey};
use edgemap_store::{GraphStore, MemoryStore};

use crate::fixtures::{Filesystem, FlakyStore, file, folder};

const FOLDER: RelKey<One> = RelKey::new("folder");

// =============================================================================
// Get
// =============================================================================

#[test]
fn get_without_edge_is_absent() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let f = file(&fs, &mapper);

    let one = mapper.rel(&f, FOLDER).unwrap();
    assert_eq!(one.get().unwrap(), None);
    assert_eq!(one.get_rel().unwrap(), None);
    assert!(!one.is_set().unwrap());
}

#[test]
fn get_on_unpersisted_owner_is_absent() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let f = Node::new(&fs.file, &Attributes::new());

    assert_eq!(mapper.rel(&f, FOLDER).unwrap().get().unwrap(), None);
}

#[test]
fn get_returns_first_of_duplicates() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);

    // Bypass the setter through the inverse side
    mapper.has_many(&a, "files").unwrap().append(&f).unwrap();
    mapper.has_many(&b, "files").unwrap().append(&f).unwrap();

    let one = mapper.rel(&f, FOLDER).unwrap();
    assert_eq!(one.get_id().unwrap(), a.id());
    assert_eq!(one.proxy().len().unwrap(), 2);
}

// =============================================================================
// Set
// =============================================================================

#[test]
fn set_replaces_previous_target() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);

    let one = mapper.rel(&f, FOLDER).unwrap();
    one.set(&a).unwrap();
    let edge = one.set(&b).unwrap();

    assert_eq!(one.get_id().unwrap(), b.id());
    assert_eq!(one.get_rel().unwrap(), Some(edge));
    assert_eq!(one.proxy().len().unwrap(), 1);
    assert!(!mapper.has_many(&a, "files").unwrap().contains(&f).unwrap());
    assert_eq!(mapper.store().edge_count().unwrap(), 1);
}

#[test]
fn set_collapses_duplicates() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);
    mapper.has_many(&a, "files").unwrap().append(&f).unwrap();
    mapper.has_many(&b, "files").unwrap().append(&f).unwrap();

    mapper.rel(&f, FOLDER).unwrap().set(&b).unwrap();

    assert_eq!(mapper.store().edge_count().unwrap(), 1);
}

#[test]
fn set_on_unpersisted_owner_fails() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let a = folder(&fs, &mapper);
    let f = Node::new(&fs.file, &Attributes::new());

    let err = mapper.rel(&f, FOLDER).unwrap().set(&a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnpersistedOwner { .. }));
}

#[test]
fn self_referencing_has_one() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let root = folder(&fs, &mapper);
    let child = folder(&fs, &mapper);

    let parent = mapper.has_one(&child, "parent").unwrap();
    parent.set(&root).unwrap();
    assert_eq!(parent.get_id().unwrap(), root.id());
    assert_eq!(mapper.has_one(&root, "parent").unwrap().get().unwrap(), None);
}

// =============================================================================
// Failed Replace
// =============================================================================

#[test]
fn failed_replace_rolls_back_with_transactions() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(FlakyStore::new(MemoryStore::new()));
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);

    let one = mapper.rel(&f, FOLDER).unwrap();
    one.set(&a).unwrap();
    mapper.store().arm();

    assert!(one.set(&b).unwrap_err().is_store_error());
    assert_eq!(one.get_id().unwrap(), a.id());
}

#[test]
fn failed_replace_without_transactions_leaves_nothing() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(FlakyStore::new(MemoryStore::without_transactions()));
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);

    let one = mapper.rel(&f, FOLDER).unwrap();
    one.set(&a).unwrap();
    mapper.store().arm();

    assert!(one.set(&b).unwrap_err().is_store_error());
    // Known gap: the delete happened, the create did not
    assert_eq!(one.get().unwrap(), None);
}

#[test]
fn transactional_replace_can_be_turned_off() {
    let fs = Filesystem::new();
    let config = MappingConfig::default().with_transactional_replace(false);
    let mut mapper = Mapper::with_config(FlakyStore::new(MemoryStore::new()), config);
    mapper.register(&fs.folder);
    mapper.register(&fs.file);
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);

    let one = mapper.rel(&f, FOLDER).unwrap();
    one.set(&a).unwrap();
    mapper.store().arm();

    assert!(one.set(&b).is_err());
    assert_eq!(one.get().unwrap(), None);
}

// =============================================================================
// Concurrency
// =============================================================================

/// Two unsynchronized replaces on the same relationship. Each caller deletes
/// what it saw, then creates its own edge, so one or two edges survive
/// depending on interleaving. This documents the race; it is not a guarantee.
#[test]
fn concurrent_set_is_a_known_race() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::without_transactions());
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);
    let barrier = Barrier::new(2);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = [&a, &b]
            .into_iter()
            .map(|target| {
                let (mapper, f, barrier) = (&mapper, &f, &barrier);
                s.spawn(move || {
                    let one = mapper.rel(f, FOLDER).unwrap();
                    barrier.wait();
                    one.set(target).map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        if let Err(err) = result {
            assert!(err.is_store_error(), "{err}");
        }
    }
    let edges = mapper.store().edge_count().unwrap();
    assert!((1..=2).contains(&edges), "{edges} edges");

    // A single uncontended set restores the invariant
    mapper.rel(&f, FOLDER).unwrap().set(&a).unwrap();
    assert_eq!(mapper.store().edge_count().unwrap(), 1);
    assert!(!mapper.store().supports_transactions());
}

/// The same race with transactional replace. A caller that fails rolls back
/// only its own writes, so an edge another caller already committed stays.
#[test]
fn concurrent_set_with_transactions_keeps_committed_edges() {
    let fs = Filesystem::new();
    let mapper = fs.mapper(MemoryStore::new());
    let a = folder(&fs, &mapper);
    let b = folder(&fs, &mapper);
    let f = file(&fs, &mapper);
    let barrier = Barrier::new(2);

    for _ in 0..8 {
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = [&a, &b]
                .into_iter()
                .map(|target| {
                    let (mapper, f, barrier) = (&mapper, &f, &barrier);
                    s.spawn(move || {
                        let one = mapper.rel(f, FOLDER).unwrap();
                        barrier.wait();
                        one.set(target)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let committed: Vec<_> = results
            .iter()
            .filter_map(|result| match result {
                Ok(edge) => Some(edge.clone()),
                Err(err) => {
                    assert!(err.is_store_error(), "{err}");
                    None
                }
            })
            .collect();
        assert!(!committed.is_empty());
        let edges = mapper.store().edge_count().unwrap();
        assert!((1..=2).contains(&edges), "{edges} edges");
        if let [edge] = committed.as_slice() {
            assert_eq!(mapper.store().edge(edge.id).unwrap(), *edge);
        }

        mapper.rel(&f, FOLDER).unwrap().set(&a).unwrap();
        assert_eq!(mapper.store().edge_count().unwrap(), 1);
    }
    assert!(mapper.store().supports_transactions());
}
