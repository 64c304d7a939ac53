//! In-memory graph store.
//!
//! All graph state lives in persistent collections, so traversals iterate
//! over an O(1) snapshot taken when they start and never hold the lock while
//! the caller consumes them.
//!
//! Transactions keep a per-thread undo journal. Every write a thread makes
//! inside [`GraphStore::atomically`] records how to reverse it, and a failed
//! unit of work replays that journal backwards. Writes from other threads are
//! never touched, and identities are never handed out twice.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};

use edgemap_foundation::{Attributes, EdgeId, Error, Label, NodeId, Result};
use tracing::{debug, trace, warn};

use crate::edge::{Direction, Edge, Step};
use crate::node::{NodeRecord, NodeTable};
use crate::store::{GraphStore, Traversal};

/// Complete graph state. Clone is O(1).
#[derive(Clone, Debug, Default)]
struct Graph {
    /// Live nodes.
    nodes: NodeTable,
    /// Edges by identity.
    edges: im::HashMap<EdgeId, Edge>,
    /// Incident edges per node, in creation order. Self-loops appear once.
    adjacency: im::HashMap<NodeId, im::Vector<EdgeId>>,
    /// Next edge identity to hand out.
    next_edge: u64,
}

/// Where an edge sat in its endpoints' adjacency lists.
#[derive(Clone, Copy, Debug)]
struct Slots {
    start: Option<usize>,
    end: Option<usize>,
}

/// How to reverse one committed write.
#[derive(Clone, Debug)]
enum Undo {
    CreateNode(NodeId),
    DeleteNode {
        id: NodeId,
        record: NodeRecord,
        edges: Vec<(Edge, Slots)>,
    },
    UpdateNode {
        id: NodeId,
        previous: Attributes,
    },
    CreateEdge(EdgeId),
    DeleteEdge {
        edge: Edge,
        slots: Slots,
    },
}

impl Graph {
    fn link(&mut self, edge_type: &Label, start: NodeId, end: NodeId) -> Result<Edge> {
        self.nodes.validate(start)?;
        self.nodes.validate(end)?;

        let edge = Edge {
            id: EdgeId(self.next_edge),
            edge_type: edge_type.clone(),
            start,
            end,
        };
        self.next_edge += 1;

        self.edges.insert(edge.id, edge.clone());
        self.adjacency
            .entry(start)
            .or_insert_with(im::Vector::new)
            .push_back(edge.id);
        if end != start {
            self.adjacency
                .entry(end)
                .or_insert_with(im::Vector::new)
                .push_back(edge.id);
        }
        Ok(edge)
    }

    /// Puts a removed edge back under its old identity and positions.
    fn relink(&mut self, edge: Edge, slots: Slots) -> Result<()> {
        self.nodes.validate(edge.start)?;
        self.nodes.validate(edge.end)?;

        let mut put = |node: NodeId, slot: Option<usize>| {
            let incident = self.adjacency.entry(node).or_insert_with(im::Vector::new);
            let at = slot.unwrap_or(incident.len()).min(incident.len());
            incident.insert(at, edge.id);
        };
        put(edge.start, slots.start);
        if edge.end != edge.start {
            put(edge.end, slots.end);
        }
        self.edges.insert(edge.id, edge);
        Ok(())
    }

    fn unlink(&mut self, id: EdgeId) -> Result<(Edge, Slots)> {
        let edge = self.edges.remove(&id).ok_or_else(|| Error::edge_not_found(id))?;
        let mut take = |node: NodeId| {
            let incident = self.adjacency.get_mut(&node)?;
            let at = incident.index_of(&id)?;
            incident.remove(at);
            Some(at)
        };
        let start = take(edge.start);
        let end = if edge.end == edge.start {
            None
        } else {
            take(edge.end)
        };
        Ok((edge, Slots { start, end }))
    }

    fn delete_node(&mut self, node: NodeId) -> Result<Undo> {
        self.nodes.validate(node)?;

        let incident = self.adjacency.get(&node).cloned().unwrap_or_default();
        let mut edges = Vec::with_capacity(incident.len());
        for edge in incident {
            edges.push(self.unlink(edge)?);
        }
        self.adjacency.remove(&node);
        let record = self.nodes.remove(node)?;
        Ok(Undo::DeleteNode {
            id: node,
            record,
            edges,
        })
    }

    fn undo(&mut self, entry: Undo) -> Result<()> {
        match entry {
            Undo::CreateNode(id) => self.delete_node(id).map(|_| ()),
            Undo::DeleteNode { id, record, edges } => {
                self.nodes.revive(id, record)?;
                for (edge, slots) in edges.into_iter().rev() {
                    self.relink(edge, slots)?;
                }
                Ok(())
            }
            Undo::UpdateNode { id, previous } => {
                self.nodes.set_properties(id, previous).map(|_| ())
            }
            Undo::CreateEdge(id) => self.unlink(id).map(|_| ()),
            Undo::DeleteEdge { edge, slots } => self.relink(edge, slots),
        }
    }
}

/// Reference [`GraphStore`] that keeps everything in memory.
///
/// Safe to share across threads. Edges to a node are returned in the order
/// they were created; duplicate edges are kept.
#[derive(Debug)]
pub struct MemoryStore {
    graph: RwLock<Graph>,
    /// Undo journals of threads inside `atomically`.
    journals: Mutex<HashMap<ThreadId, Vec<Undo>>>,
    transactional: bool,
}

/// Closes a thread's journal when its outermost transaction ends, even on
/// unwind.
struct JournalScope<'a> {
    store: &'a MemoryStore,
    thread: ThreadId,
    outermost: bool,
}

impl Drop for JournalScope<'_> {
    fn drop(&mut self) {
        if self.outermost {
            if let Ok(mut journals) = self.store.journals.lock() {
                journals.remove(&self.thread);
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store with transaction support.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(Graph::default()),
            journals: Mutex::new(HashMap::new()),
            transactional: true,
        }
    }

    /// Creates an empty store whose [`GraphStore::atomically`] does not roll back.
    #[must_use]
    pub fn without_transactions() -> Self {
        Self {
            transactional: false,
            ..Self::new()
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Graph>> {
        self.graph
            .read()
            .map_err(|_| Error::store("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Graph>> {
        self.graph
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))
    }

    fn journals(&self) -> Result<MutexGuard<'_, HashMap<ThreadId, Vec<Undo>>>> {
        self.journals
            .lock()
            .map_err(|_| Error::store("memory store journal poisoned"))
    }

    /// Appends to the calling thread's journal if it is inside a transaction.
    fn record(&self, entry: Undo) -> Result<()> {
        if !self.transactional {
            return Ok(());
        }
        if let Some(journal) = self.journals()?.get_mut(&thread::current().id()) {
            journal.push(entry);
        }
        Ok(())
    }

    fn rollback(&self, entries: Vec<Undo>) -> Result<()> {
        let mut graph = self.write()?;
        for entry in entries.into_iter().rev() {
            if let Err(err) = graph.undo(entry) {
                // Another thread already changed what this entry touched
                warn!(error = %err, "rollback step skipped");
            }
        }
        Ok(())
    }

    /// Deletes a node together with every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not live.
    pub fn delete_node(&self, node: NodeId) -> Result<()> {
        let undo = self.write()?.delete_node(node)?;
        debug!(%node, "deleted node");
        self.record(undo)
    }

    /// Returns an edge by identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist.
    pub fn edge(&self, id: EdgeId) -> Result<Edge> {
        self.read()?
            .edges
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::edge_not_found(id))
    }

    /// Returns the number of live nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn node_count(&self) -> Result<usize> {
        Ok(self.read()?.nodes.len())
    }

    /// Returns the number of edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn edge_count(&self) -> Result<usize> {
        Ok(self.read()?.edges.len())
    }
}

impl GraphStore for MemoryStore {
    fn create_node(&self, node_type: &Label, properties: &Attributes) -> Result<NodeId> {
        let id = self
            .write()?
            .nodes
            .insert(node_type.clone(), properties.clone());
        debug!(%node_type, node = %id, "created node");
        self.record(Undo::CreateNode(id))?;
        Ok(id)
    }

    fn node_type(&self, node: NodeId) -> Result<Label> {
        Ok(self.read()?.nodes.get(node)?.node_type.clone())
    }

    fn properties(&self, node: NodeId) -> Result<Attributes> {
        Ok(self.read()?.nodes.get(node)?.properties.clone())
    }

    fn update_node(&self, node: NodeId, properties: &Attributes) -> Result<()> {
        let previous = self
            .write()?
            .nodes
            .set_properties(node, properties.clone())?;
        self.record(Undo::UpdateNode { id: node, previous })
    }

    fn contains_node(&self, node: NodeId) -> bool {
        self.read().is_ok_and(|graph| graph.nodes.exists(node))
    }

    fn traverse(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
    ) -> Result<Traversal<'_>> {
        let snapshot = self.read()?.clone();
        snapshot.nodes.validate(node)?;
        trace!(%node, %edge_type, ?direction, "traverse");

        let incident = snapshot.adjacency.get(&node).cloned().unwrap_or_default();
        let edge_type = edge_type.clone();
        let steps = incident.into_iter().filter_map(move |id| {
            let Some(edge) = snapshot.edges.get(&id) else {
                return Some(Err(Error::edge_not_found(id)));
            };
            if edge.edge_type != edge_type || !direction.matches(edge, node) {
                return None;
            }
            Some(Ok(Step {
                other: edge.other(node),
                edge: edge.clone(),
            }))
        });
        Ok(Box::new(steps))
    }

    fn create_edge(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
        other: NodeId,
    ) -> Result<Edge> {
        let (start, end) = direction.endpoints(node, other);
        let edge = self.write()?.link(edge_type, start, end)?;
        debug!(edge = %edge.id, %edge_type, %start, %end, "created edge");
        self.record(Undo::CreateEdge(edge.id))?;
        Ok(edge)
    }

    fn delete_edge(&self, edge: EdgeId) -> Result<()> {
        let (removed, slots) = self.write()?.unlink(edge)?;
        debug!(%edge, "deleted edge");
        self.record(Undo::DeleteEdge {
            edge: removed,
            slots,
        })
    }

    fn supports_transactions(&self) -> bool {
        self.transactional
    }

    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.transactional {
            return f();
        }

        let thread = thread::current().id();
        let (scope, mark) = {
            let mut journals = self.journals()?;
            let outermost = !journals.contains_key(&thread);
            let mark = journals.entry(thread).or_default().len();
            let scope = JournalScope {
                store: self,
                thread,
                outermost,
            };
            (scope, mark)
        };

        match f() {
            Ok(value) => Ok(value),
            Err(err) => {
                let entries = self
                    .journals()?
                    .get_mut(&thread)
                    .map(|journal| journal.split_off(mark))
                    .unwrap_or_default();
                drop(scope);
                let undone = entries.len();
                self.rollback(entries)?;
                debug!(error = %err, undone, "rolled back");
                Err(err)
            }
        }
    }
}
