//! Integration tests for Layer 2: Mapping
//!
//! Tests for declarations, relationship accessors, deferred attributes, and
//! failure behavior against the store.

mod fixtures;
mod has_one;
