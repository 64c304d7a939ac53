//! Edges, traversal steps, and direction semantics.

use edgemap_foundation::{EdgeId, Label, NodeId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which end of an edge a node occupies during traversal or creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// The node is the start of the edge.
    #[default]
    Outgoing,
    /// The node is the end of the edge.
    Incoming,
    /// The node may be either end. New edges start at the node.
    Both,
}

impl Direction {
    /// Orders `(node, other)` as `(start, end)` for a new edge.
    #[must_use]
    pub const fn endpoints(self, node: NodeId, other: NodeId) -> (NodeId, NodeId) {
        match self {
            Self::Outgoing | Self::Both => (node, other),
            Self::Incoming => (other, node),
        }
    }

    /// Returns true if `edge` is incident to `node` in this direction.
    #[must_use]
    pub fn matches(self, edge: &Edge, node: NodeId) -> bool {
        match self {
            Self::Outgoing => edge.start == node,
            Self::Incoming => edge.end == node,
            Self::Both => edge.start == node || edge.end == node,
        }
    }
}

/// A typed, directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Store-assigned identity.
    pub id: EdgeId,
    /// Edge type label.
    pub edge_type: Label,
    /// Start node.
    pub start: NodeId,
    /// End node.
    pub end: NodeId,
}

impl Edge {
    /// Returns the endpoint opposite to `node`.
    ///
    /// For self-loops this is `node` itself.
    #[must_use]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }
}

/// One traversal result: the edge and the node at its far end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The traversed edge.
    pub edge: Edge,
    /// The node on the other side of the edge.
    pub other: NodeId,
}
