//! Edgemap - Typed relationship mapping for graph-model entities
//!
//! This crate re-exports all layers of the edgemap system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: edgemap_mapping    : Schemas, relationship proxies, accessors, partitioning
//! Layer 1: edgemap_store      : Graph store contract, in-memory store
//! Layer 0: edgemap_foundation : Core types (NodeId, Label, Value, Attributes, Error)
//! ```

pub use edgemap_foundation as foundation;
pub use edgemap_mapping as mapping;
pub use edgemap_store as store;
