//! Core identifiers, values, attributes, and errors for edgemap.
//!
//! This crate provides:
//! - [`NodeId`] / [`EdgeId`] - Store-assigned identities
//! - [`Label`] - Names for entity types, relationships, and edge types
//! - [`Value`] - Property and attribute values
//! - [`Attributes`] - Persistent ordered attribute mappings
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attributes;
pub mod error;
pub mod id;
pub mod label;
pub mod value;

pub use attributes::Attributes;
pub use error::{Error, ErrorContext, ErrorKind};
pub use id::{EdgeId, NodeId};
pub use label::Label;
pub use value::Value;

/// Result type alias for edgemap operations.
pub type Result<T> = std::result::Result<T, Error>;
