//! Shared schemas and stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use edgemap_foundation::{Attributes, EdgeId, Error, Label, NodeId, Result};
use edgemap_mapping::{DeclParams, Mapper, Node, NodeSchema};
use edgemap_store::{Direction, Edge, GraphStore, MemoryStore, Traversal};

/// Folder -[files]-> File, with the inverse declared on File.
pub struct Filesystem {
    pub folder: Arc<NodeSchema>,
    pub file: Arc<NodeSchema>,
}

impl Filesystem {
    pub fn new() -> Self {
        let folder = NodeSchema::builder("Folder")
            .has_many_with("files", DeclParams::to("File"))
            .has_one_with("parent", DeclParams::to("Folder"))
            .build();
        let file = NodeSchema::builder("File")
            .has_one_with("folder", DeclParams::from("Folder").with_edge_type("files"))
            .has_many("tags")
            .build();
        Self { folder, file }
    }

    pub fn mapper<S: GraphStore>(&self, store: S) -> Mapper<S> {
        let mut mapper = Mapper::new(store);
        mapper.register(&self.folder);
        mapper.register(&self.file);
        mapper
    }
}

pub fn folder<S: GraphStore>(fs: &Filesystem, mapper: &Mapper<S>) -> Node {
    mapper.create(&fs.folder, &Attributes::new()).unwrap()
}

pub fn file<S: GraphStore>(fs: &Filesystem, mapper: &Mapper<S>) -> Node {
    mapper.create(&fs.file, &Attributes::new()).unwrap()
}

/// Store wrapper that fails `create_edge` while armed and counts calls.
pub struct FlakyStore {
    inner: MemoryStore,
    armed: AtomicBool,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl GraphStore for FlakyStore {
    fn create_node(&self, node_type: &Label, properties: &Attributes) -> Result<NodeId> {
        self.record();
        self.inner.create_node(node_type, properties)
    }

    fn node_type(&self, node: NodeId) -> Result<Label> {
        self.record();
        self.inner.node_type(node)
    }

    fn properties(&self, node: NodeId) -> Result<Attributes> {
        self.record();
        self.inner.properties(node)
    }

    fn update_node(&self, node: NodeId, properties: &Attributes) -> Result<()> {
        self.record();
        self.inner.update_node(node, properties)
    }

    fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    fn traverse(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
    ) -> Result<Traversal<'_>> {
        self.record();
        self.inner.traverse(node, edge_type, direction)
    }

    fn create_edge(
        &self,
        node: NodeId,
        edge_type: &Label,
        direction: Direction,
        other: NodeId,
    ) -> Result<Edge> {
        self.record();
        if self.armed.load(Ordering::SeqCst) {
            return Err(Error::store("injected create_edge failure"));
        }
        self.inner.create_edge(node, edge_type, direction, other)
    }

    fn delete_edge(&self, edge: EdgeId) -> Result<()> {
        self.record();
        self.inner.delete_edge(edge)
    }

    fn supports_transactions(&self) -> bool {
        self.inner.supports_transactions()
    }

    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.inner.atomically(f)
    }
}
