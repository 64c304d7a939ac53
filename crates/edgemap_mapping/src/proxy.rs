//! Relationship proxies.
//!
//! A [`RelationshipProxy`] binds one owning node to one relationship
//! descriptor and drives the store's traverse, create and delete primitives
//! on its behalf. Proxies are built fresh for every accessor call and hold
//! nothing beyond that binding. Traversals are lazy and restartable: every
//! call to [`Sequence::iter`] issues a new store query.

use std::fmt;
use std::iter;

use edgemap_foundation::{Error, ErrorContext, ErrorKind, Label, NodeId, Result};
use edgemap_store::{Edge, GraphStore, Step, Traversal};
use tracing::{debug, trace, warn};

use crate::descriptor::RelationshipDescriptor;
use crate::mapper::Mapper;
use crate::node::Endpoint;

/// A node reached through a relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedNode {
    /// Identity of the related node.
    pub id: NodeId,
    /// Declared target type, or the stored type when none is declared.
    pub node_type: Label,
}

impl Endpoint for RelatedNode {
    fn node_id(&self) -> Option<NodeId> {
        Some(self.id)
    }
}

/// Binding of one owning node and one relationship.
pub struct RelationshipProxy<'a, S> {
    mapper: &'a Mapper<S>,
    owner: Option<NodeId>,
    owner_type: Label,
    descriptor: RelationshipDescriptor,
}

impl<S> Clone for RelationshipProxy<'_, S> {
    fn clone(&self) -> Self {
        Self {
            mapper: self.mapper,
            owner: self.owner,
            owner_type: self.owner_type.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<S> fmt::Debug for RelationshipProxy<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipProxy")
            .field("owner", &self.owner)
            .field("owner_type", &self.owner_type)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<'a, S: GraphStore> RelationshipProxy<'a, S> {
    pub(crate) fn new(
        mapper: &'a Mapper<S>,
        owner: Option<NodeId>,
        owner_type: Label,
        descriptor: RelationshipDescriptor,
    ) -> Self {
        Self {
            mapper,
            owner,
            owner_type,
            descriptor,
        }
    }

    /// The bound relationship.
    #[must_use]
    pub fn descriptor(&self) -> &RelationshipDescriptor {
        &self.descriptor
    }

    /// The owning node, if persisted.
    #[must_use]
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Related nodes, in store order.
    #[must_use]
    pub fn nodes(&self) -> Sequence<'a, S, RelatedNode> {
        Sequence::new(self.clone(), Self::related)
    }

    /// Identities of related nodes, in store order.
    #[must_use]
    pub fn ids(&self) -> Sequence<'a, S, NodeId> {
        Sequence::new(self.clone(), |_, step| Ok(step.other))
    }

    /// Edges of this relationship, in store order.
    #[must_use]
    pub fn rels(&self) -> Sequence<'a, S, Edge> {
        Sequence::new(self.clone(), |_, step| Ok(step.edge))
    }

    /// First related node the store yields.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn first(&self) -> Result<Option<RelatedNode>> {
        self.nodes().first()
    }

    /// First edge the store yields.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn first_rel(&self) -> Result<Option<Edge>> {
        self.rels().first()
    }

    /// Number of edges.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn len(&self) -> Result<usize> {
        self.rels().count()
    }

    /// Returns true if there are no edges.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.first_rel()?.is_none())
    }

    /// Returns true if at least one edge leads to `target`.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn contains(&self, target: &impl Endpoint) -> Result<bool> {
        let Some(target) = target.node_id() else {
            return Ok(false);
        };
        for other in self.ids().iter() {
            if other? == target {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Creates one edge to `target`.
    ///
    /// Existing edges are not checked, so appending twice creates two edges.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner` or `UnpersistedTarget` before any store
    /// call, `TargetTypeMismatch` if the target has the wrong type, or any
    /// store error.
    pub fn append(&self, target: &impl Endpoint) -> Result<Edge> {
        let owner = self.owner_id("append")?;
        let target = self.target_id(target)?;
        self.check_target(owner, target)?;
        self.create(owner, target)
    }

    /// Appends each target in order.
    ///
    /// Stops at the first failure; edges created before it remain.
    ///
    /// # Errors
    ///
    /// Same as [`RelationshipProxy::append`].
    pub fn append_all<I>(&self, targets: I) -> Result<Vec<Edge>>
    where
        I: IntoIterator,
        I::Item: Endpoint,
    {
        targets
            .into_iter()
            .map(|target| self.append(&target))
            .collect()
    }

    /// Deletes one edge of this relationship.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner`, `EdgeNotFound` if `edge` does not belong to
    /// this relationship on this owner, or any store error.
    pub fn remove(&self, edge: &Edge) -> Result<()> {
        let owner = self.owner_id("remove")?;
        if edge.edge_type != *self.descriptor.edge_type()
            || !self.descriptor.direction().matches(edge, owner)
        {
            return Err(Error::edge_not_found(edge.id));
        }
        self.mapper.store().delete_edge(edge.id)?;
        debug!(
            owner = %owner,
            relationship = %self.descriptor.name(),
            edge = %edge.id,
            "edge removed"
        );
        Ok(())
    }

    /// Deletes every edge of this relationship that leads to `target`.
    ///
    /// Returns the number of edges deleted.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner` or any store error.
    pub fn remove_node(&self, target: &impl Endpoint) -> Result<usize> {
        let owner = self.owner_id("remove")?;
        let Some(target) = target.node_id() else {
            return Ok(0);
        };
        let edges: Vec<Edge> = self
            .rels()
            .iter()
            .filter(|edge| edge.as_ref().map_or(true, |edge| edge.other(owner) == target))
            .collect::<Result<_>>()?;
        self.delete_edges(owner, &edges)
    }

    /// Deletes every edge of this relationship.
    ///
    /// Returns the number of edges deleted.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner` or any store error.
    pub fn clear(&self) -> Result<usize> {
        let owner = self.owner_id("clear")?;
        let edges = self.rels().to_vec()?;
        self.delete_edges(owner, &edges)
    }

    /// Replaces every edge of this relationship with one edge to `target`.
    ///
    /// Runs inside [`GraphStore::atomically`] when the store supports
    /// transactions and the mapper is configured to use them. Otherwise a
    /// failed create leaves the relationship empty, and concurrent replaces
    /// may interleave.
    ///
    /// # Errors
    ///
    /// Returns `UnpersistedOwner` or `UnpersistedTarget` before any store
    /// call, `TargetTypeMismatch` if the target has the wrong type, or any
    /// store error.
    pub fn replace(&self, target: &impl Endpoint) -> Result<Edge> {
        let owner = self.owner_id("set")?;
        let target = self.target_id(target)?;
        self.check_target(owner, target)?;

        let store = self.mapper.store();
        let run = || -> Result<Edge> {
            let edges = self.rels().to_vec()?;
            self.delete_edges(owner, &edges)?;
            self.create(owner, target)
        };

        if !store.supports_transactions() {
            warn!(
                owner = %owner,
                relationship = %self.descriptor.name(),
                "replacing relationship without transaction support"
            );
            run()
        } else if self.mapper.config().transactional_replace {
            store.atomically(run)
        } else {
            run()
        }
    }

    fn related(&self, step: Step) -> Result<RelatedNode> {
        let node_type = match self.descriptor.target_type() {
            Some(ty) => ty.clone(),
            None => self.mapper.store().node_type(step.other)?,
        };
        Ok(RelatedNode {
            id: step.other,
            node_type,
        })
    }

    fn steps(&self) -> Result<Traversal<'a>> {
        let Some(owner) = self.owner else {
            return Ok(Box::new(iter::empty()));
        };
        trace!(
            owner = %owner,
            relationship = %self.descriptor.name(),
            edge_type = %self.descriptor.edge_type(),
            direction = ?self.descriptor.direction(),
            "traverse"
        );
        self.mapper.store().traverse(
            owner,
            self.descriptor.edge_type(),
            self.descriptor.direction(),
        )
    }

    fn owner_id(&self, operation: &str) -> Result<NodeId> {
        self.owner.ok_or_else(|| {
            Error::unpersisted_owner(self.owner_type.clone(), self.descriptor.name().clone())
                .with_context(
                    ErrorContext::new()
                        .with_node_type(self.owner_type.clone())
                        .with_frame(format!("{operation} {}", self.descriptor.name())),
                )
        })
    }

    fn target_id(&self, target: &impl Endpoint) -> Result<NodeId> {
        target
            .node_id()
            .ok_or_else(|| Error::unpersisted_target(self.descriptor.name().clone()))
    }

    fn check_target(&self, owner: NodeId, target: NodeId) -> Result<()> {
        let Some(expected) = self.descriptor.target_type() else {
            return Ok(());
        };
        if !self.mapper.config().enforce_target_type {
            return Ok(());
        }
        let actual = self.mapper.store().node_type(target)?;
        if self.mapper.conforms(&actual, expected) {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::TargetTypeMismatch {
                relationship: self.descriptor.name().clone(),
                expected: expected.clone(),
                actual,
            })
            .with_context(
                ErrorContext::new()
                    .with_node_type(self.owner_type.clone())
                    .with_node(owner)
                    .with_frame(format!("link {} to {target}", self.descriptor.name())),
            ))
        }
    }

    fn create(&self, owner: NodeId, target: NodeId) -> Result<Edge> {
        let edge = self.mapper.store().create_edge(
            owner,
            self.descriptor.edge_type(),
            self.descriptor.direction(),
            target,
        )?;
        debug!(
            owner = %owner,
            relationship = %self.descriptor.name(),
            target = %target,
            edge = %edge.id,
            "edge created"
        );
        Ok(edge)
    }

    fn delete_edges(&self, owner: NodeId, edges: &[Edge]) -> Result<usize> {
        let store = self.mapper.store();
        for edge in edges {
            store.delete_edge(edge.id)?;
        }
        if !edges.is_empty() {
            debug!(
                owner = %owner,
                relationship = %self.descriptor.name(),
                count = edges.len(),
                "edges removed"
            );
        }
        Ok(edges.len())
    }
}

type Project<'a, S, T> = fn(&RelationshipProxy<'a, S>, Step) -> Result<T>;

/// Lazy, restartable sequence of traversal results.
///
/// Holds no results itself. Each [`Sequence::iter`] call queries the store
/// again, so two passes may differ if the store changed in between. A
/// sequence over an unpersisted owner is empty.
pub struct Sequence<'a, S, T> {
    proxy: RelationshipProxy<'a, S>,
    project: Project<'a, S, T>,
}

impl<S, T> Clone for Sequence<'_, S, T> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
            project: self.project,
        }
    }
}

impl<S, T> fmt::Debug for Sequence<'_, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl<'a, S: GraphStore, T> Sequence<'a, S, T> {
    fn new(proxy: RelationshipProxy<'a, S>, project: Project<'a, S, T>) -> Self {
        Self { proxy, project }
    }

    /// Starts a fresh traversal.
    ///
    /// A traversal that cannot start yields its error as the only item.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Result<T>> + '_> {
        match self.proxy.steps() {
            Ok(steps) => Box::new(
                steps.map(move |step| step.and_then(|step| (self.project)(&self.proxy, step))),
            ),
            Err(err) => Box::new(iter::once(Err(err))),
        }
    }

    /// Collects one full traversal.
    ///
    /// # Errors
    ///
    /// Returns the first error the traversal raises.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }

    /// First result of a fresh traversal.
    ///
    /// # Errors
    ///
    /// Returns the error if the first item fails.
    pub fn first(&self) -> Result<Option<T>> {
        self.iter().next().transpose()
    }

    /// Number of results of a fresh traversal.
    ///
    /// # Errors
    ///
    /// Returns the first error the traversal raises.
    pub fn count(&self) -> Result<usize> {
        self.iter().try_fold(0, |n, item| item.map(|_| n + 1))
    }
}

impl<'s, S: GraphStore, T> IntoIterator for &'s Sequence<'_, S, T> {
    type Item = Result<T>;
    type IntoIter = Box<dyn Iterator<Item = Result<T>> + 's>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
