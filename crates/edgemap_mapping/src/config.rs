//! Configuration for the mapping layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`Mapper`](crate::Mapper).
///
/// Controls how strictly relationship writes are checked and how replace
/// behaves against stores without transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MappingConfig {
    /// Run `has_one` replace inside the store's unit of work when the store
    /// supports one.
    pub transactional_replace: bool,

    /// Reject related nodes whose stored type is not the declared target type.
    pub enforce_target_type: bool,

    /// Apply deferred relationship attributes when a node is saved.
    pub apply_deferred_on_save: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            transactional_replace: true,
            enforce_target_type: true,
            apply_deferred_on_save: true,
        }
    }
}

impl MappingConfig {
    /// Every check on. Same as the default.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Skips target type checks. Useful when node types are not registered
    /// with the mapper or when importing loosely typed data.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            enforce_target_type: false,
            ..Self::default()
        }
    }

    /// Builder method to set transactional replace.
    #[must_use]
    pub fn with_transactional_replace(mut self, enabled: bool) -> Self {
        self.transactional_replace = enabled;
        self
    }

    /// Builder method to set target type enforcement.
    #[must_use]
    pub fn with_enforce_target_type(mut self, enabled: bool) -> Self {
        self.enforce_target_type = enabled;
        self
    }

    /// Builder method to set deferred application on save.
    #[must_use]
    pub fn with_apply_deferred_on_save(mut self, enabled: bool) -> Self {
        self.apply_deferred_on_save = enabled;
        self
    }
}
