//! Integration tests for Layer 0: Foundation
//!
//! Tests for identifiers, values, attribute mappings, and errors.

mod attributes;
mod errors;
