//! The mapper: a store, a configuration, and the known node types.
//!
//! Every accessor call goes through [`Mapper`], which looks up the
//! relationship on the node's schema and binds a fresh
//! [`RelationshipProxy`] to it.

use std::sync::Arc;

use edgemap_foundation::{Attributes, Error, ErrorKind, Label, NodeId, Result, Value};
use edgemap_store::GraphStore;
use tracing::debug;

use crate::accessor::{CardinalityKind, HasMany, HasOne, RelKey, RelationshipAccessor};
use crate::config::MappingConfig;
use crate::node::Node;
use crate::partition::{Targets, targets};
use crate::proxy::RelationshipProxy;
use crate::schema::NodeSchema;

/// Maps declared relationships onto a [`GraphStore`].
#[derive(Debug)]
pub struct Mapper<S> {
    store: S,
    config: MappingConfig,
    catalog: im::HashMap<Label, Arc<NodeSchema>>,
}

impl<S: GraphStore> Mapper<S> {
    /// Creates a mapper with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, MappingConfig::default())
    }

    /// Creates a mapper with an explicit configuration.
    #[must_use]
    pub fn with_config(store: S, config: MappingConfig) -> Self {
        Self {
            store,
            config,
            catalog: im::HashMap::new(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Registers a node type.
    ///
    /// Registered types take part in subtype-aware target checks and in
    /// [`Mapper::load`] resolving a stored node to its most specific type.
    pub fn register(&mut self, schema: &Arc<NodeSchema>) {
        debug!(node_type = %schema.name(), "node type registered");
        self.catalog.insert(schema.name().clone(), Arc::clone(schema));
    }

    /// Looks up a registered node type.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&Arc<NodeSchema>> {
        self.catalog.get(name)
    }

    /// Returns true if a node stored as `actual` may stand where `expected`
    /// is declared.
    pub(crate) fn conforms(&self, actual: &Label, expected: &Label) -> bool {
        actual == expected
            || self
                .catalog
                .get(actual)
                .is_some_and(|schema| schema.is_a(expected.as_str()))
    }

    /// Builds a node from `attributes` and saves it.
    ///
    /// # Errors
    ///
    /// See [`Mapper::save`].
    pub fn create(&self, schema: &Arc<NodeSchema>, attributes: &Attributes) -> Result<Node> {
        let mut node = Node::new(schema, attributes);
        self.save(&mut node)?;
        Ok(node)
    }

    /// Persists a node.
    ///
    /// Unpersisted nodes are created; persisted nodes have their properties
    /// written back. Afterwards deferred relationship attributes are applied,
    /// unless the configuration turns that off.
    ///
    /// # Errors
    ///
    /// Returns any store error, or any error from [`Mapper::apply_deferred`].
    pub fn save(&self, node: &mut Node) -> Result<()> {
        match node.id() {
            Some(id) => {
                self.store.update_node(id, node.properties())?;
                debug!(node = %id, node_type = %node.node_type(), "node updated");
            }
            None => {
                let id = self.store.create_node(node.node_type(), node.properties())?;
                node.set_id(id);
                debug!(node = %id, node_type = %node.node_type(), "node created");
            }
        }

        if self.config.apply_deferred_on_save {
            self.apply_deferred(node)?;
        }
        Ok(())
    }

    /// Applies a persisted node's deferred relationship attributes.
    ///
    /// `has_one` entries replace the relationship (nil clears it); `has_many`
    /// entries append each node in order. Entries are applied in name order
    /// and each is dropped from the pending set once it succeeds. On failure
    /// the failed entry and everything after it stay pending; for `has_many`
    /// only the targets not yet appended remain.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner` if the node has no identity,
    /// `InvalidRelationshipValue` for a value of the wrong shape, or any
    /// error from the relationship operation.
    pub fn apply_deferred(&self, node: &mut Node) -> Result<()> {
        let pending = node.pending().clone();
        let Some((first, _)) = pending.iter().next() else {
            return Ok(());
        };
        let Some(owner) = node.id() else {
            return Err(Error::unpersisted_owner(
                node.node_type().clone(),
                first.clone(),
            ));
        };
        let schema = Arc::clone(node.schema());

        for (name, value) in pending.iter() {
            let descriptor = schema.relationship(name.as_str())?;
            let proxy = RelationshipProxy::new(
                self,
                Some(owner),
                schema.name().clone(),
                descriptor.clone(),
            );

            match targets(descriptor, value)? {
                Targets::Set(target) => {
                    proxy.replace(&target)?;
                }
                Targets::Clear => {
                    proxy.clear()?;
                }
                Targets::Append(ids) => {
                    for (applied, target) in ids.iter().enumerate() {
                        if let Err(err) = proxy.append(target) {
                            node.assign(name.clone(), Value::nodes(ids[applied..].iter().copied()));
                            return Err(err);
                        }
                    }
                }
            }

            node.resolve_pending(name.as_str());
            debug!(node = %owner, relationship = %name, "deferred relationship applied");
        }
        Ok(())
    }

    /// Loads a stored node as `schema`.
    ///
    /// If the stored type is a registered subtype of `schema`, the node is
    /// loaded with that subtype's schema.
    ///
    /// # Errors
    ///
    /// Returns `NodeTypeMismatch` if the stored node is not a `schema`, or
    /// any store error.
    pub fn load(&self, schema: &Arc<NodeSchema>, id: NodeId) -> Result<Node> {
        let actual = self.store.node_type(id)?;
        let resolved = if actual == *schema.name() {
            Arc::clone(schema)
        } else {
            match self.catalog.get(&actual) {
                Some(sub) if sub.is_a(schema.name().as_str()) => Arc::clone(sub),
                _ => {
                    return Err(Error::new(ErrorKind::NodeTypeMismatch {
                        expected: schema.name().clone(),
                        actual,
                    }));
                }
            }
        };
        let properties = self.store.properties(id)?;
        let mut node = Node::persisted(&resolved, id, &Attributes::new());
        node.set_properties(properties);
        Ok(node)
    }

    /// Binds a proxy for `node`'s relationship `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if `name` is not declared on the node's
    /// type or its ancestors.
    pub fn proxy(&self, node: &Node, name: &str) -> Result<RelationshipProxy<'_, S>> {
        let descriptor = node.schema().relationship(name)?;
        Ok(RelationshipProxy::new(
            self,
            node.id(),
            node.node_type().clone(),
            descriptor.clone(),
        ))
    }

    /// Accessor for `name`, shaped by its declared cardinality.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if `name` is not declared.
    pub fn relationship(&self, node: &Node, name: &str) -> Result<RelationshipAccessor<'_, S>> {
        self.proxy(node, name).map(RelationshipAccessor::new)
    }

    /// Accessor for a `has_many` relationship.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if `name` is not declared, or
    /// `CardinalityMismatch` if it is declared `has_one`.
    pub fn has_many(&self, node: &Node, name: &str) -> Result<HasMany<'_, S>> {
        self.relationship(node, name)?.into_many()
    }

    /// Accessor for a `has_one` relationship.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if `name` is not declared, or
    /// `CardinalityMismatch` if it is declared `has_many`.
    pub fn has_one(&self, node: &Node, name: &str) -> Result<HasOne<'_, S>> {
        self.relationship(node, name)?.into_one()
    }

    /// Accessor for a typed relationship key.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRelationship` if the key's name is not declared, or
    /// `CardinalityMismatch` if it is declared with the other cardinality.
    pub fn rel<C: CardinalityKind>(
        &self,
        node: &Node,
        key: RelKey<C>,
    ) -> Result<C::Accessor<'_, S>> {
        key.accessor(self.proxy(node, key.name())?)
    }
}
