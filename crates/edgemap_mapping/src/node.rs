//! Node instances.
//!
//! A [`Node`] is one entity of some [`NodeSchema`] type. Before it is saved
//! it has no identity, so relationship-valued attributes supplied at
//! construction are held back until the store has assigned one.

use std::sync::Arc;

use edgemap_foundation::{Attributes, Label, NodeId, Value};

use crate::partition::partition;
use crate::schema::NodeSchema;

/// Anything that can stand at either end of an edge.
pub trait Endpoint {
    /// The stored identity, or `None` if not persisted yet.
    fn node_id(&self) -> Option<NodeId>;

    /// Returns true if the endpoint has a stored identity.
    fn is_persisted(&self) -> bool {
        self.node_id().is_some()
    }
}

impl Endpoint for NodeId {
    fn node_id(&self) -> Option<NodeId> {
        (!self.is_null()).then_some(*self)
    }
}

impl<T: Endpoint + ?Sized> Endpoint for &T {
    fn node_id(&self) -> Option<NodeId> {
        (**self).node_id()
    }
}

/// One node of a declared type.
#[derive(Clone, Debug)]
pub struct Node {
    schema: Arc<NodeSchema>,
    id: Option<NodeId>,
    properties: Attributes,
    pending: Attributes,
}

impl Node {
    /// Creates an unpersisted node.
    ///
    /// `attributes` is split against the schema's relationships: plain
    /// entries become properties, relationship entries wait until the node
    /// is saved. The caller's mapping is not modified.
    #[must_use]
    pub fn new(schema: &Arc<NodeSchema>, attributes: &Attributes) -> Self {
        let parts = partition(attributes, schema.relationships());
        Self {
            schema: Arc::clone(schema),
            id: None,
            properties: parts.plain,
            pending: parts.relationships,
        }
    }

    /// Wraps a node the store already holds.
    ///
    /// Relationship entries in `attributes` are still deferred; they are
    /// applied on the next save. A null `id` yields an unpersisted node.
    #[must_use]
    pub fn persisted(schema: &Arc<NodeSchema>, id: NodeId, attributes: &Attributes) -> Self {
        Self {
            id: id.node_id(),
            ..Self::new(schema, attributes)
        }
    }

    /// The node's schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<NodeSchema> {
        &self.schema
    }

    /// The node's type name.
    #[must_use]
    pub fn node_type(&self) -> &Label {
        self.schema.name()
    }

    /// The stored identity, if persisted.
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// Returns true if the store has assigned an identity.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Plain properties.
    #[must_use]
    pub fn properties(&self) -> &Attributes {
        &self.properties
    }

    /// Gets one plain property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Relationship-valued attributes not yet applied.
    #[must_use]
    pub fn pending(&self) -> &Attributes {
        &self.pending
    }

    /// Returns true if relationship attributes are waiting to be applied.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Assigns one attribute.
    ///
    /// Relationship names are deferred exactly as at construction; anything
    /// else updates the plain properties. Nothing reaches the store until the
    /// node is saved.
    pub fn assign(&mut self, name: impl Into<Label>, value: impl Into<Value>) {
        let name = name.into();
        if self.schema.relationships().contains(name.as_str()) {
            self.pending = self.pending.insert(name, value);
        } else {
            self.properties = self.properties.insert(name, value);
        }
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = Some(id);
    }

    pub(crate) fn set_properties(&mut self, properties: Attributes) {
        self.properties = properties;
    }

    pub(crate) fn resolve_pending(&mut self, name: &str) {
        self.pending = self.pending.remove(name);
    }
}

impl Endpoint for Node {
    fn node_id(&self) -> Option<NodeId> {
        self.id
    }
}
