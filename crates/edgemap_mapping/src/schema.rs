//! Node type schemas.
//!
//! A [`NodeSchema`] is built once per node type with a [`SchemaBuilder`] and
//! then shared by `Arc` with every node of that type. Nothing about it can
//! change after `build`.

use std::sync::Arc;

use edgemap_foundation::{Label, Result};

use crate::descriptor::{Cardinality, DeclParams, RelationshipDescriptor};
use crate::registry::RelationshipRegistry;

/// Immutable schema of one node type.
#[derive(Debug)]
pub struct NodeSchema {
    name: Label,
    parent: Option<Arc<NodeSchema>>,
    relationships: RelationshipRegistry,
}

impl NodeSchema {
    /// Starts building a schema for a root node type.
    #[must_use]
    pub fn builder(name: impl Into<Label>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Node type name.
    #[must_use]
    pub fn name(&self) -> &Label {
        &self.name
    }

    /// Parent schema, if this type extends another.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<NodeSchema>> {
        self.parent.as_ref()
    }

    /// Effective relationship registry (own plus inherited declarations).
    #[must_use]
    pub fn relationships(&self) -> &RelationshipRegistry {
        &self.relationships
    }

    /// Looks up a relationship by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if the name is not declared.
    pub fn relationship(&self, name: &str) -> Result<&RelationshipDescriptor> {
        self.relationships.lookup(name)
    }

    /// Returns true if this type is `type_name` or extends it.
    #[must_use]
    pub fn is_a(&self, type_name: &str) -> bool {
        self.ancestry().any(|schema| schema.name == *type_name)
    }

    /// Iterates from this schema up through its ancestors.
    pub fn ancestry(&self) -> impl Iterator<Item = &NodeSchema> {
        std::iter::successors(Some(self), |schema| schema.parent.as_deref())
    }
}

/// Builder for [`NodeSchema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: Label,
    parent: Option<Arc<NodeSchema>>,
    relationships: RelationshipRegistry,
}

impl SchemaBuilder {
    /// Starts a schema for a root node type.
    #[must_use]
    pub fn new(name: impl Into<Label>) -> Self {
        let name = name.into();
        Self {
            relationships: RelationshipRegistry::new(name.clone()),
            name,
            parent: None,
        }
    }

    /// Starts a schema for a node type that extends `parent`.
    #[must_use]
    pub fn extending(parent: &Arc<NodeSchema>, name: impl Into<Label>) -> Self {
        let name = name.into();
        Self {
            relationships: RelationshipRegistry::extending(name.clone(), &parent.relationships),
            name,
            parent: Some(Arc::clone(parent)),
        }
    }

    /// Declares a relationship with explicit cardinality and parameters.
    #[must_use]
    pub fn declare(
        mut self,
        name: impl Into<Label>,
        cardinality: Cardinality,
        params: DeclParams,
    ) -> Self {
        self.relationships.declare(name, cardinality, params);
        self
    }

    /// Declares a `has_many` relationship with default parameters.
    #[must_use]
    pub fn has_many(self, name: impl Into<Label>) -> Self {
        self.declare(name, Cardinality::Many, DeclParams::new())
    }

    /// Declares a `has_many` relationship.
    #[must_use]
    pub fn has_many_with(self, name: impl Into<Label>, params: DeclParams) -> Self {
        self.declare(name, Cardinality::Many, params)
    }

    /// Declares a `has_one` relationship with default parameters.
    #[must_use]
    pub fn has_one(self, name: impl Into<Label>) -> Self {
        self.declare(name, Cardinality::One, DeclParams::new())
    }

    /// Declares a `has_one` relationship.
    #[must_use]
    pub fn has_one_with(self, name: impl Into<Label>, params: DeclParams) -> Self {
        self.declare(name, Cardinality::One, params)
    }

    /// Freezes the schema.
    #[must_use]
    pub fn build(self) -> Arc<NodeSchema> {
        Arc::new(NodeSchema {
            name: self.name,
            parent: self.parent,
            relationships: self.relationships,
        })
    }
}
