//! Declared relationships between graph-model nodes.
//!
//! This crate maps typed, declared relationships onto the primitives of a
//! [`GraphStore`](edgemap_store::GraphStore):
//! - [`RelationshipDescriptor`] / [`RelationshipRegistry`] - What a node type declares
//! - [`NodeSchema`] - Immutable per-type schema shared by every node of that type
//! - [`RelationshipProxy`] - Traversal, append, and removal for one relationship
//! - [`HasMany`] / [`HasOne`] - The accessor shapes each cardinality exposes
//! - [`partition`] - Splits construction attributes into plain and deferred
//! - [`Mapper`] - Ties a store, configuration, and schemas together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accessor;
pub mod config;
pub mod descriptor;
pub mod mapper;
pub mod node;
pub mod partition;
pub mod proxy;
pub mod registry;
pub mod schema;

pub use accessor::{CardinalityKind, HasMany, HasOne, Many, One, RelKey, RelationshipAccessor};
pub use config::MappingConfig;
pub use descriptor::{Cardinality, DeclParams, RelationshipDescriptor};
pub use mapper::Mapper;
pub use node::{Endpoint, Node};
pub use partition::{Partitioned, partition};
pub use proxy::{RelatedNode, RelationshipProxy, Sequence};
pub use registry::RelationshipRegistry;
pub use schema::{NodeSchema, SchemaBuilder};
