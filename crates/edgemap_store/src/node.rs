//! Node lifecycle management with generational indices.
//!
//! The `NodeTable` allocates node identities, tracks generations to detect
//! stale references to deleted nodes, and holds each live node's type label
//! and properties.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use edgemap_foundation::{Attributes, Error, Label, NodeId, Result};

/// What the store remembers about a live node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Type label the node was created with.
    pub node_type: Label,
    /// Stored properties.
    pub properties: Attributes,
}

/// Manages node lifecycle and generation tracking.
///
/// Nodes are allocated from a free list when available, otherwise new
/// indices are allocated. When a node is deleted its index goes back on the
/// free list and its generation is incremented. Even generations are free,
/// odd generations are alive.
///
/// All collections are persistent, so cloning a table is O(1).
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    /// Generation counter for each node index.
    generations: im::Vector<u32>,
    /// Free list of indices available for reuse.
    free_list: im::Vector<u64>,
    /// Records of live nodes.
    records: im::HashMap<NodeId, NodeRecord>,
}

impl NodeTable {
    /// Creates an empty node table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new node and returns its ID.
    ///
    /// Reuses indices from the free list when available.
    pub fn insert(&mut self, node_type: Label, properties: Attributes) -> NodeId {
        let id = if let Some(index) = self.free_list.pop_back() {
            let idx = index as usize;
            // Was even/free, now odd/alive
            let generation = self.generations[idx] + 1;
            self.generations.set(idx, generation);
            NodeId::new(index, generation)
        } else {
            let index = self.generations.len() as u64;
            // New nodes start at generation 1 (odd = alive)
            self.generations.push_back(1);
            NodeId::new(index, 1)
        };

        self.records.insert(
            id,
            NodeRecord {
                node_type,
                properties,
            },
        );
        id
    }

    /// Deletes a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is stale or already deleted.
    pub fn remove(&mut self, id: NodeId) -> Result<NodeRecord> {
        self.validate(id)?;

        let idx = id.index as usize;
        // Was odd/alive, now even/free
        self.generations.set(idx, id.generation + 1);
        self.free_list.push_back(id.index);

        self.records
            .remove(&id)
            .ok_or_else(|| Error::node_not_found(id))
    }

    /// Checks if a node exists and is not stale.
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.validate(id).is_ok()
    }

    /// Validates that a node is live.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node never existed or its slot is free,
    /// and `StaleNode` if the slot was reused by a newer node.
    pub fn validate(&self, id: NodeId) -> Result<()> {
        let Some(&current_gen) = self.generations.get(id.index as usize) else {
            return Err(Error::node_not_found(id));
        };

        if current_gen != id.generation {
            // Deleted and possibly reused
            return Err(Error::stale_node(id));
        }

        if current_gen % 2 == 0 {
            return Err(Error::node_not_found(id));
        }

        Ok(())
    }

    /// Returns the record of a live node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not live.
    pub fn get(&self, id: NodeId) -> Result<&NodeRecord> {
        self.validate(id)?;
        self.records.get(&id).ok_or_else(|| Error::node_not_found(id))
    }

    /// Replaces the properties of a live node, returning the previous ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not live.
    pub fn set_properties(&mut self, id: NodeId, properties: Attributes) -> Result<Attributes> {
        self.validate(id)?;
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| Error::node_not_found(id))?;
        Ok(std::mem::replace(&mut record.properties, properties))
    }

    /// Brings a just-removed node back under its old identity.
    ///
    /// Only succeeds while the slot is still free from that removal. Once the
    /// index has been handed out again the old identity stays dead.
    ///
    /// # Errors
    ///
    /// Returns `StaleNode` if the slot was reused or removed again.
    pub fn revive(&mut self, id: NodeId, record: NodeRecord) -> Result<()> {
        let idx = id.index as usize;
        let freed = self.generations.get(idx) == Some(&(id.generation + 1));
        let Some(slot) = self.free_list.iter().position(|&index| index == id.index) else {
            return Err(Error::stale_node(id));
        };
        if !freed {
            return Err(Error::stale_node(id));
        }

        self.free_list.remove(slot);
        self.generations.set(idx, id.generation);
        self.records.insert(id, record);
        Ok(())
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all live node IDs in index order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| *generation % 2 == 1)
            .map(|(idx, generation)| NodeId::new(idx as u64, *generation))
    }
}
