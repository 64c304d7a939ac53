//! Graph store contract and in-memory graph store for edgemap.
//!
//! This crate provides:
//! - [`GraphStore`] - The node/edge primitives the mapping layer drives
//! - [`Edge`], [`Step`], [`Direction`] - Traversal vocabulary
//! - [`MemoryStore`] - Reference store built on persistent collections

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod edge;
pub mod memory;
pub mod node;
pub mod store;

pub use edge::{Direction, Edge, Step};
pub use memory::MemoryStore;
pub use node::{NodeRecord, NodeTable};
pub use store::{GraphStore, Traversal};
