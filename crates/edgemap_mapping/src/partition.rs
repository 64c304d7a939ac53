//! Splitting construction attributes.
//!
//! A node under construction has no identity yet, so edges cannot be created
//! for it. [`partition`] separates relationship-valued entries from plain
//! properties so the former can wait until the node is saved.

use edgemap_foundation::{Attributes, Error, ErrorKind, NodeId, Result, Value};

use crate::descriptor::{Cardinality, RelationshipDescriptor};
use crate::registry::RelationshipRegistry;

/// Result of [`partition`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partitioned {
    /// Entries whose names are not declared relationships.
    pub plain: Attributes,
    /// Entries whose names are declared relationships.
    pub relationships: Attributes,
}

/// Splits `attributes` by whether each name is a declared relationship.
///
/// Works on a persistent copy; the caller's mapping is never modified.
/// Every input entry lands in exactly one half.
#[must_use]
pub fn partition(attributes: &Attributes, registry: &RelationshipRegistry) -> Partitioned {
    let mut plain = attributes.clone();
    let mut relationships = Attributes::new();

    for descriptor in registry.iter() {
        if let Some((rest, value)) = plain.take(descriptor.name().as_str()) {
            plain = rest;
            relationships = relationships.insert(descriptor.name().clone(), value);
        }
    }

    Partitioned {
        plain,
        relationships,
    }
}

/// What a deferred relationship value asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Targets {
    /// Set a `has_one` relationship.
    Set(NodeId),
    /// Clear a `has_one` relationship.
    Clear,
    /// Append to a `has_many` relationship, in order.
    Append(Vec<NodeId>),
}

/// Interprets a deferred value against the relationship's cardinality.
///
/// `has_one` accepts a node or nil. `has_many` accepts a list of nodes, a
/// single node, or nil (nothing to append).
pub(crate) fn targets(descriptor: &RelationshipDescriptor, value: &Value) -> Result<Targets> {
    let invalid = |expected: &'static str| {
        Error::new(ErrorKind::InvalidRelationshipValue {
            relationship: descriptor.name().clone(),
            expected,
            actual: value.kind_name(),
        })
    };

    match (descriptor.cardinality(), value) {
        (Cardinality::One, Value::Node(id)) => Ok(Targets::Set(*id)),
        (Cardinality::One, Value::Nil) => Ok(Targets::Clear),
        (Cardinality::One, _) => Err(invalid("a node or nil")),
        (Cardinality::Many, Value::Node(id)) => Ok(Targets::Append(vec![*id])),
        (Cardinality::Many, Value::Nil) => Ok(Targets::Append(Vec::new())),
        (Cardinality::Many, Value::List(items)) => items
            .iter()
            .map(|item| item.as_node().ok_or_else(|| invalid("a list of nodes")))
            .collect::<Result<Vec<_>>>()
            .map(Targets::Append),
        (Cardinality::Many, _) => Err(invalid("a list of nodes")),
    }
}
