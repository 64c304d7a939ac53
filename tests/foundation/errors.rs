//! Integration tests for Error types
//!
//! Tests error construction, display, context, and classification.

use edgemap_foundation::{EdgeId, Error, ErrorContext, ErrorKind, Label, NodeId};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_relationship() {
    let err = Error::unknown_relationship(Label::new("Folder"), "filez");
    assert!(matches!(err.kind, ErrorKind::UnknownRelationship { .. }));
    assert_eq!(format!("{err}"), "unknown relationship filez on Folder");
}

#[test]
fn error_unpersisted_owner() {
    let err = Error::unpersisted_owner(Label::new("File"), Label::new("folder"));
    assert!(matches!(err.kind, ErrorKind::UnpersistedOwner { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("folder"));
    assert!(msg.contains("not persisted"));
}

#[test]
fn error_unpersisted_target() {
    let err = Error::unpersisted_target(Label::new("tags"));
    assert!(matches!(err.kind, ErrorKind::UnpersistedTarget { .. }));
    assert!(format!("{err}").contains("tags"));
}

#[test]
fn error_cardinality_mismatch() {
    let err = Error::new(ErrorKind::CardinalityMismatch {
        name: Label::new("files"),
        declared: "many",
        requested: "one",
    });
    assert_eq!(
        format!("{err}"),
        "relationship files is declared as many, not one"
    );
}

#[test]
fn error_node_not_found() {
    let err = Error::node_not_found(NodeId::new(42, 1));
    assert!(matches!(err.kind, ErrorKind::NodeNotFound(_)));
    assert!(format!("{err}").contains("42"));
}

#[test]
fn error_edge_not_found() {
    let err = Error::edge_not_found(EdgeId(7));
    assert!(format!("{err}").contains("EdgeId(7)"));
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn store_family_is_classified() {
    assert!(Error::node_not_found(NodeId::new(0, 1)).is_store_error());
    assert!(Error::stale_node(NodeId::new(0, 3)).is_store_error());
    assert!(Error::edge_not_found(EdgeId(0)).is_store_error());
    assert!(Error::store("connection reset").is_store_error());
}

#[test]
fn mapping_errors_are_not_store_errors() {
    let errors = [
        Error::unknown_relationship(Label::new("A"), "b"),
        Error::unpersisted_owner(Label::new("A"), Label::new("b")),
        Error::unpersisted_target(Label::new("b")),
        Error::new(ErrorKind::CardinalityMismatch {
            name: Label::new("b"),
            declared: "many",
            requested: "one",
        }),
    ];
    for err in errors {
        assert!(!err.is_store_error(), "{err}");
    }
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_display() {
    let ctx = ErrorContext::new()
        .with_node_type(Label::new("File"))
        .with_node(NodeId::new(3, 1))
        .with_frame("append tags");

    let text = format!("{ctx}");
    assert!(text.starts_with("at File Node(3)"));
    assert!(text.contains("in append tags"));
}

#[test]
fn context_is_optional() {
    let err = Error::store("boom");
    assert!(err.context.is_none());

    let err = err.with_context(ErrorContext::new().with_frame("save"));
    assert_eq!(err.context.unwrap().stack.len(), 1);
}
