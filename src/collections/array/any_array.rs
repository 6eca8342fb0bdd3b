use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;
use std::ptr;

use parking_lot::RwLock;
use rand::Rng;

use super::Sequence;
use crate::traits::IsZero;
use crate::util::error::{IndexOutOfBounds, InvalidChunkSize};
use crate::util::result::ResultExtension;

/// A growable, ordered collection that can be shared between threads.
///
/// Every method takes `&self` and holds an internal read-write lock for its entire duration: a
/// write lock for methods that change the AnyArray and a read lock for everything else. Values
/// leave the AnyArray as clones (or through [`into_vec`](AnyArray::into_vec)), never as references
/// into the locked storage, so nothing can observe or change the contents without the lock.
///
/// Mutating methods return `&Self` so that they can be chained. Each call in a chain takes the lock
/// separately, so other threads may interleave between calls.
///
/// Closures passed to methods such as [`retain`](AnyArray::retain) or [`each`](AnyArray::each)
/// run while the lock is held. Calling back into the same AnyArray from one of them will deadlock.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the AnyArray.
/// - `m`: The number of items in the other collection or argument list.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `get` / `at` / `set` | `O(1)` |
/// | `push` | `O(1)`* |
/// | `all` / `to_vec` | `O(n)` |
/// | `retain` / `filter` | `O(n)` |
/// | `unique` | `O(n)` |
/// | `remove_by_indexes` | `O(n+m)` |
/// | `remove_by_values` | `O(n*m)` |
/// | `contains` / `index_of` | `O(n)` |
/// | `intersection` / `difference` | `O(n*m)` |
/// | `union` | `O((n+m)^2)` |
///
/// \* Amortized, `O(n)` when the backing storage has to grow.
pub struct AnyArray<T> {
    pub(crate) inner: RwLock<Sequence<T>>,
}

impl<T> AnyArray<T> {
    /// Creates a new, empty AnyArray.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr: AnyArray<u8> = AnyArray::new();
    /// assert!(arr.is_empty());
    /// ```
    pub fn new() -> AnyArray<T> {
        AnyArray::from_sequence(Sequence::new())
    }

    /// Wraps an existing Vec without copying it.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec![1, 2, 3]);
    /// assert_eq!(arr.len(), 3);
    /// ```
    pub fn from_vec(data: Vec<T>) -> AnyArray<T> {
        AnyArray::from_sequence(Sequence::from_vec(data))
    }

    /// Creates an empty AnyArray that can hold `cap` elements before reallocating.
    pub fn with_cap(cap: usize) -> AnyArray<T> {
        AnyArray::from_sequence(Sequence::with_cap(cap))
    }

    /// Creates an AnyArray holding `len` default values.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::<u32>::repeat_default(3);
    /// assert_eq!(arr.all(), [0, 0, 0]);
    /// ```
    pub fn repeat_default(len: usize) -> AnyArray<T>
    where
        T: Default,
    {
        AnyArray::from_sequence(Sequence::repeat_default(len))
    }

    pub(crate) fn from_sequence(seq: Sequence<T>) -> AnyArray<T> {
        AnyArray {
            inner: RwLock::new(seq),
        }
    }

    /// Returns the number of elements in the AnyArray.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the AnyArray contains no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns true if `index` refers to an element, i.e. `index < len`.
    pub fn has(&self, index: usize) -> bool {
        self.inner.read().has(index)
    }

    /// Returns a clone of the element at `index`, or None if `index` is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec!['a', 'b']);
    /// assert_eq!(arr.get(1), Some('b'));
    /// assert_eq!(arr.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().get(index).cloned()
    }

    /// Returns a clone of the element at `index`, for callers that have already validated the
    /// index. Prefer [`get`](AnyArray::get) when the index may be out of bounds.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn at(&self, index: usize) -> T
    where
        T: Clone,
    {
        self.inner.read().try_get(index).throw().clone()
    }

    /// Returns clones of the elements at each of `indexes`, in the order given. Indexes that are
    /// out of bounds are skipped.
    pub fn get_by_indexes(&self, indexes: &[usize]) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read().get_by_indexes(indexes)
    }

    /// Replaces the element at `index` with `value`, returning the old element.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn set(&self, index: usize, value: T) -> T {
        self.try_set(index, value).throw()
    }

    /// Replaces the element at `index` with `value`, returning the old element, or an error if
    /// `index` is out of bounds. The AnyArray is unchanged on error.
    pub fn try_set(&self, index: usize, value: T) -> Result<T, IndexOutOfBounds> {
        self.inner.write().replace(index, value)
    }

    /// Pushes `value` onto the end of the AnyArray.
    pub fn push(&self, value: T) -> &Self {
        self.inner.write().push(value);
        self
    }

    /// Appends every value from `values` to the end of the AnyArray, in order. The values are
    /// added under a single write lock.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec![1]);
    /// arr.append([2, 3]).push(4);
    /// assert_eq!(arr.all(), [1, 2, 3, 4]);
    /// ```
    pub fn append<I: IntoIterator<Item = T>>(&self, values: I) -> &Self {
        self.inner.write().extend(values);
        self
    }

    /// Removes and returns the element at `index`, shifting later elements left.
    pub fn remove(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.inner.write().remove(index)
    }

    /// Returns a clone of the first element, or None if the AnyArray is empty.
    pub fn first(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().first().cloned()
    }

    /// Returns a clone of the last element, or None if the AnyArray is empty.
    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().last().cloned()
    }

    /// Returns a clone of the first element, or the default value if the AnyArray is empty.
    pub fn first_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.first().unwrap_or_default()
    }

    /// Returns a clone of the last element, or the default value if the AnyArray is empty.
    pub fn last_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.last().unwrap_or_default()
    }

    /// Returns a copy of every element, in order. Changing the returned Vec has no effect on the
    /// AnyArray.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec![1, 2]);
    /// let mut copy = arr.all();
    /// copy[0] = 100;
    /// assert_eq!(arr.all(), [1, 2]);
    /// ```
    pub fn all(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read().to_vec()
    }

    /// An alias of [`all`](AnyArray::all).
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.all()
    }

    /// Consumes the AnyArray, returning the backing Vec without copying.
    pub fn into_vec(self) -> Vec<T> {
        self.inner.into_inner().into_vec()
    }

    /// Removes every element.
    pub fn clear(&self) -> &Self {
        self.inner.write().clear();
        self
    }

    /// Returns a new AnyArray containing clones of the elements for which `pred` returns true,
    /// in their original order. Self is unchanged.
    pub fn filter<F: FnMut(&T) -> bool>(&self, pred: F) -> AnyArray<T>
    where
        T: Clone,
    {
        AnyArray::from_sequence(self.inner.read().filtered(pred))
    }

    /// Keeps only the elements for which `pred` returns true, preserving their order.
    pub fn retain<F: FnMut(&T) -> bool>(&self, pred: F) -> &Self {
        let removed = self.inner.write().retain(pred);
        log::trace!("retain dropped {removed} element(s)");
        self
    }

    /// Removes duplicate elements, keeping the first occurrence of each.
    ///
    /// Elements are compared with [`Eq`], so values are only merged when they are truly equal. See
    /// [`unique_by_key`](AnyArray::unique_by_key) for a custom identity.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec![3, 1, 3, 2, 1]);
    /// arr.unique();
    /// assert_eq!(arr.all(), [3, 1, 2]);
    /// ```
    pub fn unique(&self) -> &Self
    where
        T: Hash + Eq + Clone,
    {
        self.unique_by_key(T::clone)
    }

    /// Removes elements whose key, as produced by `key`, has already been seen, keeping the first
    /// occurrence of each key.
    pub fn unique_by_key<Q, F>(&self, key: F) -> &Self
    where
        Q: Hash + Eq,
        F: FnMut(&T) -> Q,
    {
        self.inner.write().unique_by_key(key);
        self
    }

    /// Removes elements whose [`Display`] output has already been seen.
    ///
    /// Different values that format identically are treated as duplicates. This is occasionally
    /// what is wanted for loosely typed data, but [`unique`](AnyArray::unique) is usually the right
    /// choice.
    pub fn unique_by_display(&self) -> &Self
    where
        T: Display,
    {
        self.unique_by_key(T::to_string)
    }

    /// Removes every element that [is zero](IsZero).
    pub fn remove_empty(&self) -> &Self
    where
        T: IsZero,
    {
        self.inner.write().remove_empty();
        self
    }

    /// Removes the elements at each of `indexes`. Out of bounds and repeated indexes are ignored.
    /// All indexes refer to positions before any removal.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec!['a', 'b', 'c', 'd']);
    /// arr.remove_by_indexes(&[3, 0, 10]);
    /// assert_eq!(arr.all(), ['b', 'c']);
    /// ```
    pub fn remove_by_indexes(&self, indexes: &[usize]) -> &Self {
        self.inner.write().remove_by_indexes(indexes);
        self
    }

    /// Removes every element equal to `target`.
    pub fn remove_by_value(&self, target: &T) -> &Self
    where
        T: PartialEq,
    {
        self.inner.write().remove_by_values(std::slice::from_ref(target));
        self
    }

    /// Removes every element equal to any of `targets`.
    pub fn remove_by_values(&self, targets: &[T]) -> &Self
    where
        T: PartialEq,
    {
        self.inner.write().remove_by_values(targets);
        self
    }

    /// Splits a copy of the elements into contiguous chunks of `size`. The last chunk holds the
    /// remainder and may be shorter.
    ///
    /// # Errors
    /// Returns [`InvalidChunkSize`] if `size` is 0.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr: AnyArray<u8> = (0..5).collect();
    /// assert_eq!(arr.chunk(2).unwrap(), vec![vec![0, 1], vec![2, 3], vec![4]]);
    /// assert!(arr.chunk(0).is_err());
    /// ```
    pub fn chunk(&self, size: usize) -> Result<Vec<Vec<T>>, InvalidChunkSize>
    where
        T: Clone,
    {
        self.inner.read().chunk(size)
    }

    /// Formats every element with [`Display`] and joins them with `sep`.
    pub fn join(&self, sep: &str) -> String
    where
        T: Display,
    {
        self.inner.read().join(sep)
    }

    /// Like [`join`](AnyArray::join), but skips elements that [are zero](IsZero).
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec!["a", "", "b"]);
    /// assert_eq!(arr.join_without_empty(","), "a,b");
    /// ```
    pub fn join_without_empty(&self, sep: &str) -> String
    where
        T: Display + IsZero,
    {
        self.inner.read().join_without_empty(sep)
    }

    /// Shuffles the elements in place using the thread-local random number generator.
    ///
    /// The result is not reproducible. Use [`shuffle_with`](AnyArray::shuffle_with) with a seeded
    /// generator when a fixed order is needed.
    pub fn shuffle(&self) -> &Self {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Shuffles the elements in place using the provided random number generator.
    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Self {
        let mut inner = self.inner.write();
        inner.shuffle_with(rng);
        log::trace!("shuffled {} element(s)", inner.len());
        self
    }

    /// Calls `f` with the index and a reference to each element, in order.
    pub fn each<F: FnMut(usize, &T)>(&self, f: F) -> &Self {
        self.inner.read().each(f);
        self
    }

    /// Replaces each element with the value `f` returns for it, in order.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// let arr = AnyArray::from_vec(vec![1, 2, 3]);
    /// arr.every(|v| v * 10);
    /// assert_eq!(arr.all(), [10, 20, 30]);
    /// ```
    pub fn every<F: FnMut(&T) -> T>(&self, f: F) -> &Self {
        self.inner.write().every(f);
        self
    }

    /// Creates a new AnyArray by applying `f` to each element.
    pub fn cast<U, F: FnMut(&T) -> U>(&self, f: F) -> AnyArray<U> {
        AnyArray::from_sequence(self.inner.read().cast(f))
    }

    /// Returns the index of the first element equal to `target`.
    pub fn index_of(&self, target: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.inner.read().index_of(target)
    }

    /// Returns the index of the first element for which `pred` returns true.
    pub fn find_index<F: FnMut(&T) -> bool>(&self, pred: F) -> Option<usize> {
        self.inner.read().find_index(pred)
    }

    /// Returns the indexes of every element for which `pred` returns true, in ascending order.
    pub fn find_indexes<F: FnMut(&T) -> bool>(&self, pred: F) -> Vec<usize> {
        self.inner.read().find_indexes(pred)
    }

    /// Returns true if any element is equal to `target`.
    pub fn contains(&self, target: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner.read().contains(target)
    }

    /// Returns true if no element is equal to `target`.
    pub fn not_contains(&self, target: &T) -> bool
    where
        T: PartialEq,
    {
        !self.contains(target)
    }

    /// Returns true if every element [is zero](IsZero), including when there are no elements.
    pub fn all_empty(&self) -> bool
    where
        T: IsZero,
    {
        self.inner.read().all_empty()
    }

    /// Returns true if at least one element [is zero](IsZero).
    pub fn any_empty(&self) -> bool
    where
        T: IsZero,
    {
        self.inner.read().any_empty()
    }

    /// Returns true if no element [is zero](IsZero), including when there are no elements.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::array::AnyArray;
    /// assert!(AnyArray::from_vec(vec!["a", "b"]).all_not_empty());
    /// assert!(!AnyArray::from_vec(vec!["a", ""]).all_not_empty());
    /// ```
    pub fn all_not_empty(&self) -> bool
    where
        T: IsZero,
    {
        !self.any_empty()
    }

    /// Returns a new AnyArray with the elements of self that also appear in `other`, in the order
    /// of self. (`self ∩ other`)
    pub fn intersection(&self, other: &AnyArray<T>) -> AnyArray<T>
    where
        T: PartialEq + Clone,
    {
        let other = other.all();
        AnyArray::from_sequence(self.inner.read().intersection(&other))
    }

    /// Returns a new AnyArray with the elements of self that don't appear in `other`, in the order
    /// of self. (`self \ other`)
    pub fn difference(&self, other: &AnyArray<T>) -> AnyArray<T>
    where
        T: PartialEq + Clone,
    {
        let other = other.all();
        AnyArray::from_sequence(self.inner.read().difference(&other))
    }

    /// Returns a new AnyArray with every distinct element of self, followed by every distinct
    /// element of `other` that isn't already included. (`self ∪ other`)
    pub fn union(&self, other: &AnyArray<T>) -> AnyArray<T>
    where
        T: PartialEq + Clone,
    {
        let other = other.all();
        AnyArray::from_sequence(self.inner.read().union(&other))
    }

    /// Returns true if self contains every element of `other`. (`self ⊇ other`)
    pub fn is_superset(&self, other: &AnyArray<T>) -> bool
    where
        T: PartialEq + Clone,
    {
        let other = other.all();
        self.inner.read().is_superset(&other)
    }

    /// Returns true if `other` contains every element of self. (`self ⊆ other`)
    pub fn is_subset(&self, other: &AnyArray<T>) -> bool
    where
        T: PartialEq + Clone,
    {
        other.is_superset(self)
    }
}

impl<T: Clone> Clone for AnyArray<T> {
    /// Creates an independent AnyArray with clones of every element.
    fn clone(&self) -> Self {
        AnyArray::from_sequence(self.inner.read().clone())
    }
}

impl<T: PartialEq> PartialEq for AnyArray<T> {
    fn eq(&self, other: &Self) -> bool {
        // Taking two read locks on the same RwLock can deadlock behind a waiting writer.
        if ptr::eq(self, other) {
            return true;
        }
        // Distinct AnyArrays are always locked in address order, for the same reason.
        let lhs;
        let rhs;
        if ptr::from_ref(self) < ptr::from_ref(other) {
            lhs = self.inner.read();
            rhs = other.inner.read();
        } else {
            rhs = other.inner.read();
            lhs = self.inner.read();
        }
        *lhs == *rhs
    }
}

impl<T: Eq> Eq for AnyArray<T> {}

impl<T> Default for AnyArray<T> {
    fn default() -> Self {
        AnyArray::new()
    }
}

impl<T> From<Vec<T>> for AnyArray<T> {
    fn from(value: Vec<T>) -> Self {
        AnyArray::from_vec(value)
    }
}

impl<T, const N: usize> From<[T; N]> for AnyArray<T> {
    fn from(value: [T; N]) -> Self {
        AnyArray::from_vec(Vec::from(value))
    }
}

impl<T> From<AnyArray<T>> for Vec<T> {
    fn from(value: AnyArray<T>) -> Self {
        value.into_vec()
    }
}

impl<T> FromIterator<T> for AnyArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AnyArray::from_vec(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for AnyArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        // Exclusive access, no need to lock.
        self.inner.get_mut().extend(iter);
    }
}

impl<T> IntoIterator for AnyArray<T> {
    type Item = T;

    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: Debug> Debug for AnyArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("AnyArray")
            .field("data", &*inner)
            .field("len", &inner.len())
            .finish()
    }
}

impl<T: Display> Display for AnyArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self.inner.read())
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for AnyArray<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.inner.read().iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for AnyArray<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer).map(AnyArray::from_vec)
    }
}
