//! Error types for edgemap.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::{EdgeId, NodeId};
use crate::label::Label;

/// The main error type for edgemap operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unknown relationship error.
    #[must_use]
    pub fn unknown_relationship(node_type: Label, name: impl Into<Label>) -> Self {
        Self::new(ErrorKind::UnknownRelationship {
            node_type,
            name: name.into(),
        })
    }

    /// Creates an unpersisted owner error.
    #[must_use]
    pub fn unpersisted_owner(node_type: Label, relationship: Label) -> Self {
        Self::new(ErrorKind::UnpersistedOwner {
            node_type,
            relationship,
        })
    }

    /// Creates an unpersisted target error.
    #[must_use]
    pub fn unpersisted_target(relationship: Label) -> Self {
        Self::new(ErrorKind::UnpersistedTarget { relationship })
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn node_not_found(id: NodeId) -> Self {
        Self::new(ErrorKind::NodeNotFound(id))
    }

    /// Creates a stale node reference error.
    #[must_use]
    pub fn stale_node(id: NodeId) -> Self {
        Self::new(ErrorKind::StaleNode(id))
    }

    /// Creates an edge not found error.
    #[must_use]
    pub fn edge_not_found(id: EdgeId) -> Self {
        Self::new(ErrorKind::EdgeNotFound(id))
    }

    /// Creates a generic store failure.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store(message.into()))
    }

    /// Returns true if this error was raised by the store collaborator.
    ///
    /// These errors pass through the mapping layer unchanged.
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NodeNotFound(_)
                | ErrorKind::StaleNode(_)
                | ErrorKind::EdgeNotFound(_)
                | ErrorKind::Store(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A relationship name is not declared on the node type.
    #[error("unknown relationship {name} on {node_type}")]
    UnknownRelationship {
        /// The node type that was queried.
        node_type: Label,
        /// The relationship name that was not found.
        name: Label,
    },

    /// A mutation was attempted through a node that has no stored identity.
    #[error("cannot modify relationship {relationship}: {node_type} node is not persisted")]
    UnpersistedOwner {
        /// The owning node's type.
        node_type: Label,
        /// The relationship being modified.
        relationship: Label,
    },

    /// An edge was requested to a node that has no stored identity.
    #[error("cannot link {relationship} to a node that is not persisted")]
    UnpersistedTarget {
        /// The relationship being modified.
        relationship: Label,
    },

    /// A singular accessor was used on a plural relationship or vice versa.
    #[error("relationship {name} is declared as {declared}, not {requested}")]
    CardinalityMismatch {
        /// The relationship name.
        name: Label,
        /// The declared cardinality.
        declared: &'static str,
        /// The cardinality the accessor expected.
        requested: &'static str,
    },

    /// The related node's type does not match the declared target type.
    #[error("relationship {relationship} expects {expected} nodes, got {actual}")]
    TargetTypeMismatch {
        /// The relationship name.
        relationship: Label,
        /// The declared target type.
        expected: Label,
        /// The node type found in the store.
        actual: Label,
    },

    /// A relationship-valued attribute holds something other than node references.
    #[error("invalid value for relationship {relationship}: expected {expected}, got {actual}")]
    InvalidRelationshipValue {
        /// The relationship name.
        relationship: Label,
        /// Description of the accepted shape.
        expected: &'static str,
        /// Kind of the value that was supplied.
        actual: &'static str,
    },

    /// A stored node is not of the type it is being loaded as.
    #[error("expected a {expected} node, found {actual}")]
    NodeTypeMismatch {
        /// The requested node type.
        expected: Label,
        /// The node type found in the store.
        actual: Label,
    },

    /// Node was not found in the store.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Node reference is stale (generation mismatch).
    #[error("stale node reference: {0:?}")]
    StaleNode(NodeId),

    /// Edge was not found in the store.
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    /// The store collaborator failed for a backend-specific reason.
    #[error("store operation failed: {0}")]
    Store(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Node type the operation ran against.
    pub node_type: Option<Label>,
    /// Node the operation ran against.
    pub node: Option<NodeId>,
    /// Stack of operations, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node type.
    #[must_use]
    pub fn with_node_type(mut self, node_type: Label) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Sets the node.
    #[must_use]
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    /// Adds an operation frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node_type, self.node) {
            (Some(ty), Some(node)) => write!(f, "at {ty} {node}")?,
            (Some(ty), None) => write!(f, "at {ty}")?,
            (None, Some(node)) => write!(f, "at {node}")?,
            (None, None) => {}
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
