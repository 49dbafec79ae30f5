//! Insertion-ordered set used for the resolver's "seen" attributes.
//!
//! Coin types and text keys are only ever appended; the set type makes the
//! no-duplicates rule impossible to break, which matters because the host may
//! redeliver the same event after a reorg.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// A set that remembers first-seen order. Serialized as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSet<T: Hash + Eq>(IndexSet<T>);

impl<T: Hash + Eq> OrderedSet<T> {
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// A set holding exactly `value`.
    pub fn single(value: T) -> Self {
        let mut set = Self::new();
        set.0.insert(value);
        set
    }

    /// Append `value` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, value: T) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Hash + Eq + Clone> OrderedSet<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.0.iter().cloned().collect()
    }
}

impl<T: Hash + Eq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Add `value` to an optional set field.
///
/// An unset field becomes a one-element set; a set that already holds the
/// value is left untouched. Returns `true` if the field changed.
pub fn add_if_absent<T: Hash + Eq>(field: &mut Option<OrderedSet<T>>, value: T) -> bool {
    match field {
        Some(set) => set.insert(value),
        None => {
            *field = Some(OrderedSet::single(value));
            true
        }
    }
}
