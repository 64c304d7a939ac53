//! The store collaborator contract.
//!
//! The mapping layer never touches storage directly; every read and write
//! goes through a [`GraphStore`]. Calls are synchronous and blocking. Stores
//! are shared by reference, so every method takes `&self` and implementations
//! provide their own interior synchronization.

use std::sync::Arc;

use edgemap_foundation::{Attributes, EdgeId, Label, NodeId, Result};

use crate::edge::{Direction, Edge, Step};

/// Lazy sequence of traversal results.
pub type Traversal<'a> = Box<dyn Iterator<Item = Result<Step>> + 'a>;

/// Node and edge primitives consumed by the mapping layer.
pub trait GraphStore {
    /// Persists a new node and returns its identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the node.
    fn create_node(&self, node_type: &Label, properties: &Attributes) -> Result<NodeId>;

    /// Returns the type label a node was created with.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or the reference is stale.
    fn node_type(&self, node: NodeId) -> Result<Label>;

    /// Returns the stored properties of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or the reference is stale.
    fn properties(&self, node: NodeId) -> Result<Attributes>;

    /// Replaces the stored properties of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or the reference is stale.
    fn update_node(&self, node: NodeId, properties: &Attributes) -> Result<()>;

    /// Returns true if the node exists.
    fn contains_node(&self, node: NodeId) -> bool;

    /// Traverses edges of `edge_type` incident to `node` in `direction`.
    ///
    /// Results come back in the store's own order.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist. Individual steps may also
    /// fail while the sequence is consumed.
    fn traverse(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
    ) -> Result<Traversal<'_>>;

    /// Creates one edge of `edge_type` between `node` and `other`.
    ///
    /// `direction` says which end `node` occupies; see [`Direction::endpoints`].
    /// Duplicate edges are permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint does not exist.
    fn create_edge(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
        other: NodeId,
    ) -> Result<Edge>;

    /// Deletes one edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    fn delete_edge(&self, edge: EdgeId) -> Result<()>;

    /// Returns true if [`GraphStore::atomically`] actually rolls back on failure.
    fn supports_transactions(&self) -> bool {
        false
    }

    /// Runs `f` as one unit of work.
    ///
    /// Stores with transaction support undo every change `f` made when it
    /// returns an error. The default just runs `f`.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
        Self: Sized,
    {
        f()
    }
}

macro_rules! forward_graph_store {
    ($($ty:ty),* $(,)?) => {$(
        impl<S: GraphStore> GraphStore for $ty {
            fn create_node(&self, node_type: &Label, properties: &Attributes) -> Result<NodeId> {
                (**self).create_node(node_type, properties)
            }

            fn node_type(&self, node: NodeId) -> Result<Label> {
                (**self).node_type(node)
            }

            fn properties(&self, node: NodeId) -> Result<Attributes> {
                (**self).properties(node)
            }

            fn update_node(&self, node: NodeId, properties: &Attributes) -> Result<()> {
                (**self).update_node(node, properties)
            }

            fn contains_node(&self, node: NodeId) -> bool {
                (**self).contains_node(node)
            }

            fn traverse(
                &self,
                node: NodeId,
                edge_type: &Label,
                direction: Direction,
            ) -> Result<Traversal<'_>> {
                (**self).traverse(node, edge_type, direction)
            }

            fn create_edge(
                &self,
                node: NodeId,
                edge_type: &Label,
                direction: Direction,
                other: NodeId,
            ) -> Result<Edge> {
                (**self).create_edge(node, edge_type, direction, other)
            }

            fn delete_edge(&self, edge: EdgeId) -> Result<()> {
                (**self).delete_edge(edge)
            }

            fn supports_transactions(&self) -> bool {
                (**self).supports_transactions()
            }

            fn atomically<T, F>(&self, f: F) -> Result<T>
            where
                F: FnOnce() -> Result<T>,
            {
                (**self).atomically(f)
            }
        }
    )*};
}

forward_graph_store!(&S, Arc<S>);
