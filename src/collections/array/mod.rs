//! A module containing [`AnyArray`], the thread-safe ordered collection.
//!
//! The algorithms themselves live on a crate-private, lock-free core type which [`AnyArray`] wraps
//! in a read-write lock. The ordered dictionary in [`orderly`](crate::collections::orderly) reuses
//! the same core behind its own lock.
//!
//! Owned iteration is provided through [`std::vec::IntoIter`]. Borrowed iteration isn't offered,
//! because references can't outlive the lock guarding them; use [`AnyArray::each`] or
//! [`AnyArray::all`] instead.

mod any_array;
pub(crate) mod sequence;
mod tests;

pub use any_array::*;
pub(crate) use sequence::Sequence;
