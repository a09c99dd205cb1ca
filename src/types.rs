//! Type-safe wrapper for state indices.
//!
//! Models address their states by dense 0-based indices internally.
//! The newtype keeps those indices from being mixed up with counts or
//! round numbers in the fixpoint code.

use std::fmt;

/// Index of a state inside a [`Model`][crate::model::Model] (0-indexed).
///
/// # Invariants
///
/// - A `StateId` is only meaningful for the model that produced it.
/// - Ids are assigned in insertion order and are stable for the model's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(usize);

impl StateId {
    /// Creates a new state id with the given index.
    pub fn new(index: usize) -> Self {
        StateId(index)
    }

    /// Returns the raw index as a `usize`.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(id: StateId) -> Self {
        id.0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        StateId(index)
    }
}
