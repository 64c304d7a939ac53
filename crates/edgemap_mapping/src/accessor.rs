//! Accessor shapes.
//!
//! Every declared relationship exposes one of two shapes, chosen by its
//! cardinality:
//! - [`HasMany`]: iterate nodes, iterate edges, append, explicit removal
//! - [`HasOne`]: get, get edge, set with replace, clear
//!
//! Accessors can be reached by name through [`RelationshipAccessor`], or with
//! a compile-time checked shape through a typed [`RelKey`]:
//!
//! ```
//! use edgemap_mapping::{Many, One, RelKey};
//!
//! const FILES: RelKey<Many> = RelKey::new("files");
//! const FOLDER: RelKey<One> = RelKey::new("folder");
//! # assert_eq!(FILES.name(), "files");
//! # assert_eq!(FOLDER.name(), "folder");
//! ```

use std::fmt;
use std::marker::PhantomData;

use edgemap_foundation::{Error, ErrorKind, Label, NodeId, Result};
use edgemap_store::{Edge, GraphStore};

use crate::descriptor::Cardinality;
use crate::node::Endpoint;
use crate::proxy::{RelatedNode, RelationshipProxy, Sequence};

fn cardinality_mismatch(name: &Label, declared: Cardinality, requested: Cardinality) -> Error {
    Error::new(ErrorKind::CardinalityMismatch {
        name: name.clone(),
        declared: declared.as_str(),
        requested: requested.as_str(),
    })
}

/// Accessor for a `has_many` relationship.
pub struct HasMany<'a, S> {
    proxy: RelationshipProxy<'a, S>,
}

impl<S> Clone for HasMany<'_, S> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
        }
    }
}

impl<S> fmt::Debug for HasMany<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HasMany").field(&self.proxy).finish()
    }
}

impl<'a, S: GraphStore> HasMany<'a, S> {
    /// The underlying proxy.
    #[must_use]
    pub fn proxy(&self) -> &RelationshipProxy<'a, S> {
        &self.proxy
    }

    /// Related nodes, in store order.
    #[must_use]
    pub fn nodes(&self) -> Sequence<'a, S, RelatedNode> {
        self.proxy.nodes()
    }

    /// Identities of related nodes, in store order.
    #[must_use]
    pub fn ids(&self) -> Sequence<'a, S, NodeId> {
        self.proxy.ids()
    }

    /// Edges, in store order.
    #[must_use]
    pub fn rels(&self) -> Sequence<'a, S, Edge> {
        self.proxy.rels()
    }

    /// Creates one more edge to `target`.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::append`].
    pub fn append(&self, target: &impl Endpoint) -> Result<Edge> {
        self.proxy.append(target)
    }

    /// Creates one edge per target, in order.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::append_all`].
    pub fn append_all<I>(&self, targets: I) -> Result<Vec<Edge>>
    where
        I: IntoIterator,
        I::Item: Endpoint,
    {
        self.proxy.append_all(targets)
    }

    /// Deletes one edge.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::remove`].
    pub fn remove(&self, edge: &Edge) -> Result<()> {
        self.proxy.remove(edge)
    }

    /// Deletes every edge to `target`.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::remove_node`].
    pub fn remove_node(&self, target: &impl Endpoint) -> Result<usize> {
        self.proxy.remove_node(target)
    }

    /// Deletes every edge.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::clear`].
    pub fn clear(&self) -> Result<usize> {
        self.proxy.clear()
    }

    /// Number of edges.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn len(&self) -> Result<usize> {
        self.proxy.len()
    }

    /// Returns true if there are no edges.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn is_empty(&self) -> Result<bool> {
        self.proxy.is_empty()
    }

    /// Returns true if any edge leads to `target`.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn contains(&self, target: &impl Endpoint) -> Result<bool> {
        self.proxy.contains(target)
    }
}

/// Accessor for a `has_one` relationship.
pub struct HasOne<'a, S> {
    proxy: RelationshipProxy<'a, S>,
}

impl<S> Clone for HasOne<'_, S> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
        }
    }
}

impl<S> fmt::Debug for HasOne<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HasOne").field(&self.proxy).finish()
    }
}

impl<'a, S: GraphStore> HasOne<'a, S> {
    /// The underlying proxy.
    #[must_use]
    pub fn proxy(&self) -> &RelationshipProxy<'a, S> {
        &self.proxy
    }

    /// The related node, or `None` if there is none.
    ///
    /// If several edges exist, returns whichever the store yields first.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn get(&self) -> Result<Option<RelatedNode>> {
        self.proxy.first()
    }

    /// Identity of the related node, or `None`.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn get_id(&self) -> Result<Option<NodeId>> {
        self.proxy.ids().first()
    }

    /// The edge to the related node, or `None`.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn get_rel(&self) -> Result<Option<Edge>> {
        self.proxy.first_rel()
    }

    /// Points the relationship at `target`, replacing any existing edges.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::replace`].
    pub fn set(&self, target: &impl Endpoint) -> Result<Edge> {
        self.proxy.replace(target)
    }

    /// Removes the relationship. Returns the number of edges deleted.
    ///
    /// # Errors
    ///
    /// See [`RelationshipProxy::clear`].
    pub fn clear(&self) -> Result<usize> {
        self.proxy.clear()
    }

    /// Returns true if a related node exists.
    ///
    /// # Errors
    ///
    /// Returns any store error raised by the traversal.
    pub fn is_set(&self) -> Result<bool> {
        Ok(!self.proxy.is_empty()?)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Many {}
    impl Sealed for super::One {}
}

/// Type-level cardinality, used to pick an accessor shape at compile time.
pub trait CardinalityKind: sealed::Sealed {
    /// The runtime cardinality this marker stands for.
    const CARDINALITY: Cardinality;

    /// Accessor shape for this cardinality.
    type Accessor<'a, S: GraphStore + 'a>;

    /// Wraps a proxy in this cardinality's accessor.
    fn accessor<'a, S: GraphStore + 'a>(proxy: RelationshipProxy<'a, S>) -> Self::Accessor<'a, S>;
}

/// Marker for `has_many` relationships.
#[derive(Debug)]
pub enum Many {}

/// Marker for `has_one` relationships.
#[derive(Debug)]
pub enum One {}

impl CardinalityKind for Many {
    const CARDINALITY: Cardinality = Cardinality::Many;
    type Accessor<'a, S: GraphStore + 'a> = HasMany<'a, S>;

    fn accessor<'a, S: GraphStore + 'a>(proxy: RelationshipProxy<'a, S>) -> HasMany<'a, S> {
        HasMany { proxy }
    }
}

impl CardinalityKind for One {
    const CARDINALITY: Cardinality = Cardinality::One;
    type Accessor<'a, S: GraphStore + 'a> = HasOne<'a, S>;

    fn accessor<'a, S: GraphStore + 'a>(proxy: RelationshipProxy<'a, S>) -> HasOne<'a, S> {
        HasOne { proxy }
    }
}

/// A relationship name with its cardinality fixed in the type.
pub struct RelKey<C> {
    name: &'static str,
    _marker: PhantomData<fn() -> C>,
}

impl<C> RelKey<C> {
    /// Creates a key for the relationship called `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The relationship name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<C> Clone for RelKey<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for RelKey<C> {}

impl<C: CardinalityKind> fmt::Debug for RelKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelKey<{}>({:?})", C::CARDINALITY, self.name)
    }
}

impl<C: CardinalityKind> RelKey<C> {
    pub(crate) fn accessor<'a, S: GraphStore + 'a>(
        self,
        proxy: RelationshipProxy<'a, S>,
    ) -> Result<C::Accessor<'a, S>> {
        let declared = proxy.descriptor().cardinality();
        if declared == C::CARDINALITY {
            Ok(C::accessor(proxy))
        } else {
            Err(cardinality_mismatch(
                proxy.descriptor().name(),
                declared,
                C::CARDINALITY,
            ))
        }
    }
}

/// Accessor picked by the declared cardinality at runtime.
pub enum RelationshipAccessor<'a, S> {
    /// A `has_many` relationship.
    Many(HasMany<'a, S>),
    /// A `has_one` relationship.
    One(HasOne<'a, S>),
}

impl<S> Clone for RelationshipAccessor<'_, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Many(many) => Self::Many(many.clone()),
            Self::One(one) => Self::One(one.clone()),
        }
    }
}

impl<S> fmt::Debug for RelationshipAccessor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Many(many) => many.fmt(f),
            Self::One(one) => one.fmt(f),
        }
    }
}

impl<'a, S: GraphStore> RelationshipAccessor<'a, S> {
    /// Wraps `proxy` in the shape its descriptor declares.
    #[must_use]
    pub fn new(proxy: RelationshipProxy<'a, S>) -> Self {
        match proxy.descriptor().cardinality() {
            Cardinality::Many => Self::Many(HasMany { proxy }),
            Cardinality::One => Self::One(HasOne { proxy }),
        }
    }

    /// The declared cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Many(_) => Cardinality::Many,
            Self::One(_) => Cardinality::One,
        }
    }

    /// The underlying proxy.
    #[must_use]
    pub fn proxy(&self) -> &RelationshipProxy<'a, S> {
        match self {
            Self::Many(many) => many.proxy(),
            Self::One(one) => one.proxy(),
        }
    }

    /// Unwraps a `has_many` accessor.
    ///
    /// # Errors
    ///
    /// Returns `CardinalityMismatch` for a `has_one` relationship.
    pub fn into_many(self) -> Result<HasMany<'a, S>> {
        match self {
            Self::Many(many) => Ok(many),
            Self::One(one) => Err(cardinality_mismatch(
                one.proxy.descriptor().name(),
                Cardinality::One,
                Cardinality::Many,
            )),
        }
    }

    /// Unwraps a `has_one` accessor.
    ///
    /// # Errors
    ///
    /// Returns `CardinalityMismatch` for a `has_many` relationship.
    pub fn into_one(self) -> Result<HasOne<'a, S>> {
        match self {
            Self::One(one) => Ok(one),
            Self::Many(many) => Err(cardinality_mismatch(
                many.proxy.descriptor().name(),
                Cardinality::Many,
                Cardinality::One,
            )),
        }
    }
}
