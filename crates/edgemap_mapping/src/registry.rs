//! Per-type relationship registries.
//!
//! A registry maps relationship names to descriptors for one node type.
//! Subtype registries start from a copy of their parent's effective view, so
//! a subtype sees inherited declarations and can override them by name.
//! Backed by a persistent map, so inheriting is O(1).

use edgemap_foundation::{Error, Label, Result};
use tracing::debug;

use crate::descriptor::{Cardinality, DeclParams, RelationshipDescriptor};

/// Relationship name -> descriptor mapping for one node type.
#[derive(Clone, Debug)]
pub struct RelationshipRegistry {
    node_type: Label,
    entries: im::OrdMap<Label, RelationshipDescriptor>,
}

impl RelationshipRegistry {
    /// Creates an empty registry for `node_type`.
    #[must_use]
    pub fn new(node_type: impl Into<Label>) -> Self {
        Self {
            node_type: node_type.into(),
            entries: im::OrdMap::new(),
        }
    }

    /// Creates a registry for `node_type` that inherits every declaration
    /// visible on `parent`.
    #[must_use]
    pub fn extending(node_type: impl Into<Label>, parent: &RelationshipRegistry) -> Self {
        Self {
            node_type: node_type.into(),
            entries: parent.entries.clone(),
        }
    }

    /// The node type this registry belongs to.
    #[must_use]
    pub fn node_type(&self) -> &Label {
        &self.node_type
    }

    /// Declares a relationship and returns its descriptor.
    ///
    /// Redeclaring a name replaces the earlier descriptor, whether it was
    /// declared here or inherited. Last write wins.
    pub fn declare(
        &mut self,
        name: impl Into<Label>,
        cardinality: Cardinality,
        params: DeclParams,
    ) -> &RelationshipDescriptor {
        let descriptor =
            RelationshipDescriptor::new(self.node_type.clone(), name, cardinality, params);
        let name = descriptor.name().clone();

        if let Some(previous) = self.entries.insert(name.clone(), descriptor) {
            debug!(
                node_type = %self.node_type,
                relationship = %name,
                previous = %previous.declared_by(),
                "relationship redeclared"
            );
        } else {
            debug!(
                node_type = %self.node_type,
                relationship = %name,
                %cardinality,
                "relationship declared"
            );
        }

        &self.entries[&name]
    }

    /// Looks up a relationship by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if the name is not declared on this type
    /// or any ancestor.
    pub fn lookup(&self, name: &str) -> Result<&RelationshipDescriptor> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::unknown_relationship(self.node_type.clone(), name))
    }

    /// Gets a relationship by name, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.entries.get(name)
    }

    /// Returns true if `name` is a declared relationship.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of visible relationships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no relationships are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every visible descriptor in name order.
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipDescriptor> {
        self.entries.values()
    }

    /// Iterates over descriptors declared on this type itself.
    pub fn own(&self) -> impl Iterator<Item = &RelationshipDescriptor> {
        self.entries
            .values()
            .filter(|d| d.declared_by() == &self.node_type)
    }
}
