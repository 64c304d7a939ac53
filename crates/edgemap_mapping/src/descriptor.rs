//! Relationship declarations.
//!
//! A [`RelationshipDescriptor`] is created once, when a node type is defined,
//! and never changes afterwards.

use std::fmt;

use edgemap_foundation::Label;
use edgemap_store::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many related nodes a relationship admits.
///
/// Cardinality only changes which accessor shape a relationship exposes.
/// The store represents both the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cardinality {
    /// Any number of related nodes (`has_many`).
    Many,
    /// At most one related node (`has_one`).
    One,
}

impl Cardinality {
    /// Returns the lowercase name of this cardinality.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Many => "many",
            Self::One => "one",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration-site parameters.
///
/// Everything is optional: by default the edge type is the relationship
/// name, the direction is outgoing and any node type is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeclParams {
    /// Edge type override.
    pub edge_type: Option<Label>,
    /// Which end of the edge the owning node occupies.
    pub direction: Direction,
    /// Required type of the related node.
    pub target_type: Option<Label>,
}

impl DeclParams {
    /// Creates default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing edges to nodes of `target_type`.
    #[must_use]
    pub fn to(target_type: impl Into<Label>) -> Self {
        Self::new()
            .with_direction(Direction::Outgoing)
            .with_target_type(target_type)
    }

    /// Incoming edges from nodes of `source_type`.
    ///
    /// Usually combined with [`DeclParams::with_edge_type`] to name the edge
    /// type the other side declared.
    #[must_use]
    pub fn from(source_type: impl Into<Label>) -> Self {
        Self::new()
            .with_direction(Direction::Incoming)
            .with_target_type(source_type)
    }

    /// Sets the edge type.
    #[must_use]
    pub fn with_edge_type(mut self, edge_type: impl Into<Label>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Sets the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the target type.
    #[must_use]
    pub fn with_target_type(mut self, target_type: impl Into<Label>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }
}

/// Immutable declaration of one named relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationshipDescriptor {
    name: Label,
    edge_type: Label,
    direction: Direction,
    cardinality: Cardinality,
    target_type: Option<Label>,
    declared_by: Label,
}

impl RelationshipDescriptor {
    /// Creates a descriptor for `name` declared on `declared_by`.
    #[must_use]
    pub fn new(
        declared_by: impl Into<Label>,
        name: impl Into<Label>,
        cardinality: Cardinality,
        params: DeclParams,
    ) -> Self {
        let name = name.into();
        Self {
            edge_type: params.edge_type.unwrap_or_else(|| name.clone()),
            name,
            direction: params.direction,
            cardinality,
            target_type: params.target_type,
            declared_by: declared_by.into(),
        }
    }

    /// Relationship name, unique within its node type.
    #[must_use]
    pub fn name(&self) -> &Label {
        &self.name
    }

    /// Label of the underlying store edges.
    #[must_use]
    pub fn edge_type(&self) -> &Label {
        &self.edge_type
    }

    /// Which end of the edge the owning node occupies.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Declared cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Required type of related nodes, if declared.
    #[must_use]
    pub fn target_type(&self) -> Option<&Label> {
        self.target_type.as_ref()
    }

    /// Node type that declared this relationship.
    #[must_use]
    pub fn declared_by(&self) -> &Label {
        &self.declared_by
    }

    /// Returns true for `has_many` relationships.
    #[must_use]
    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// Returns true for `has_one` relationships.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.cardinality == Cardinality::One
    }
}
