//! Strongly typed errors shared by the collections in this crate.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// An index was outside of `0..len` for the collection it was used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The offending index.
    pub index: usize,
    /// The length of the collection at the time of access.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// A chunk size of 0 was requested, which can't make progress through a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidChunkSize {
    /// The rejected size.
    pub size: usize,
}

impl Display for InvalidChunkSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid chunk size {}, chunks must hold at least one element!", self.size)
    }
}

impl Error for InvalidChunkSize {}

/// A write to an ordered dictionary would have left two entries with equal keys. `index` is the
/// position of the entry that already holds the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Key already present at index {index}, ordered dictionary keys must be unique!")]
pub struct KeyConflict {
    /// Where the conflicting key currently lives.
    pub index: usize,
}

/// The ways [`AnyOrderlyDict::try_set_by_index`](crate::collections::orderly::AnyOrderlyDict::try_set_by_index)
/// can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum SetByIndexError {
    /// The index to overwrite doesn't exist.
    IndexOutOfBounds(IndexOutOfBounds),
    /// The new key is already held by another entry.
    KeyConflict(KeyConflict),
}
