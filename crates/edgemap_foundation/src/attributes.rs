//! Persistent attribute mappings.
//!
//! An [`Attributes`] value is the generic `name -> value` mapping accepted at
//! node construction time. It is backed by `im::OrdMap`, so clones are O(1)
//! and every "modification" returns a new mapping without disturbing the
//! original. Iteration is in key order.

use std::fmt;
use std::iter::FromIterator;

use crate::label::Label;
use crate::value::Value;

/// Persistent, ordered `Label -> Value` mapping.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes(im::OrdMap<Label, Value>);

impl Attributes {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdMap::new())
    }

    /// Returns a new mapping with `key` set to `value`.
    ///
    /// Builder-style shorthand for [`Attributes::insert`].
    #[must_use]
    pub fn with(self, key: impl Into<Label>, value: impl Into<Value>) -> Self {
        self.insert(key, value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a new mapping with the entry inserted.
    #[must_use]
    pub fn insert(&self, key: impl Into<Label>, value: impl Into<Value>) -> Self {
        Self(self.0.update(key.into(), value.into()))
    }

    /// Returns a new mapping without `key`.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        Self(self.0.without(key))
    }

    /// Returns a new mapping without `key` together with the removed value.
    ///
    /// Returns `None` if the key is absent.
    #[must_use]
    pub fn take(&self, key: &str) -> Option<(Self, Value)> {
        let (value, rest) = self.0.extract(key)?;
        Some((Self(rest), value))
    }

    /// Returns a new mapping containing the entries of both; `other` wins on
    /// conflicting keys.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self(
            other
                .iter()
                .fold(self.0.clone(), |map, (k, v)| map.update(k.clone(), v.clone())),
        )
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Value)> {
        self.0.iter()
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Label> {
        self.0.keys()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Label>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Attributes {
    type Item = (Label, Value);
    type IntoIter = im::ordmap::ConsumingIter<(Label, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Attributes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        im::OrdMap::deserialize(deserializer).map(Self)
    }
}
