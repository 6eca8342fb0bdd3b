use std::collections::HashSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;
use std::iter;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::traits::IsZero;
use crate::util::error::{IndexOutOfBounds, InvalidChunkSize};
use crate::util::fmt::join_display;

/// The unlocked core shared by every ordered collection in this crate.
///
/// Sequence never locks. [`AnyArray`](super::AnyArray) wraps one in a lock and delegates to it,
/// and [`AnyOrderlyDict`](crate::collections::orderly::AnyOrderlyDict) owns two of them behind its
/// own lock. Keeping all of the algorithms here means that no locking method ever has to call
/// another locking method on the same collection.
pub(crate) struct Sequence<T> {
    pub(crate) data: Vec<T>,
}

impl<T> Sequence<T> {
    pub(crate) const fn new() -> Sequence<T> {
        Sequence {
            data: Vec::new(),
        }
    }

    pub(crate) const fn from_vec(data: Vec<T>) -> Sequence<T> {
        Sequence {
            data,
        }
    }

    pub(crate) fn with_cap(cap: usize) -> Sequence<T> {
        Sequence {
            data: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn repeat_default(len: usize) -> Sequence<T>
    where
        T: Default,
    {
        Sequence {
            data: iter::repeat_with(T::default).take(len).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn has(&self, index: usize) -> bool {
        index < self.data.len()
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if self.has(index) {
            Ok(())
        } else {
            Err(IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    pub(crate) fn try_get(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(&self.data[index])
    }

    /// Clones the elements at `indexes`, in the order given. Out of range indexes are skipped.
    pub(crate) fn get_by_indexes(&self, indexes: &[usize]) -> Vec<T>
    where
        T: Clone,
    {
        indexes.iter()
            .filter_map(|i| self.data.get(*i))
            .cloned()
            .collect()
    }

    pub(crate) fn replace(&mut self, index: usize, value: T) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.data[index], value))
    }

    pub(crate) fn push(&mut self, value: T) {
        self.data.push(value);
    }

    pub(crate) fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.data.extend(values);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(self.data.remove(index))
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.data.first()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.data.last()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub(crate) fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    pub(crate) fn filtered<F>(&self, mut pred: F) -> Sequence<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        Sequence::from_vec(
            self.data.iter()
                .filter(|item| pred(*item))
                .cloned()
                .collect()
        )
    }

    pub(crate) fn retain<F: FnMut(&T) -> bool>(&mut self, pred: F) -> usize {
        let before = self.len();
        self.data.retain(pred);
        before - self.len()
    }

    /// Keeps the first element for every distinct key produced by `key`, preserving order.
    pub(crate) fn unique_by_key<Q, F>(&mut self, mut key: F) -> usize
    where
        Q: Hash + Eq,
        F: FnMut(&T) -> Q,
    {
        let mut seen = HashSet::with_capacity(self.len());
        let removed = self.retain(|item| seen.insert(key(item)));
        log::trace!("unique removed {removed} duplicate element(s)");
        removed
    }

    /// Returns a bitmap of which positions should be kept when `indexes` are removed, along with
    /// the number of requested indexes that didn't refer to an element.
    pub(crate) fn keep_mask(&self, indexes: &[usize]) -> (Vec<bool>, usize) {
        let mut keep = vec![true; self.len()];
        let mut ignored = 0;

        for &index in indexes {
            match keep.get_mut(index) {
                Some(slot) if *slot => *slot = false,
                // Out of range, or already marked by a repeated index.
                _ => ignored += 1,
            }
        }

        (keep, ignored)
    }

    pub(crate) fn retain_mask(&mut self, keep: &[bool]) -> usize {
        let mut position = 0;
        self.retain(|_| {
            let kept = keep.get(position).copied().unwrap_or(true);
            position += 1;
            kept
        })
    }

    pub(crate) fn remove_by_indexes(&mut self, indexes: &[usize]) -> usize {
        let (keep, ignored) = self.keep_mask(indexes);
        if ignored > 0 {
            log::debug!(
                "ignored {ignored} out of range or repeated index(es) while removing from {} elements",
                self.len()
            );
        }
        self.retain_mask(&keep)
    }

    pub(crate) fn remove_by_values(&mut self, targets: &[T]) -> usize
    where
        T: PartialEq,
    {
        self.retain(|item| !targets.contains(item))
    }

    pub(crate) fn remove_empty(&mut self) -> usize
    where
        T: IsZero,
    {
        self.retain(|item| !item.is_zero())
    }

    pub(crate) fn non_empty(&self) -> impl Iterator<Item = &T>
    where
        T: IsZero,
    {
        self.data.iter().filter(|item| !item.is_zero())
    }

    pub(crate) fn all_empty(&self) -> bool
    where
        T: IsZero,
    {
        self.non_empty().count() == 0
    }

    pub(crate) fn any_empty(&self) -> bool
    where
        T: IsZero,
    {
        self.non_empty().count() != self.len()
    }

    pub(crate) fn chunk(&self, size: usize) -> Result<Vec<Vec<T>>, InvalidChunkSize>
    where
        T: Clone,
    {
        if size == 0 {
            log::warn!("rejected chunk size of 0 for {} elements", self.len());
            return Err(InvalidChunkSize { size });
        }

        Ok(self.data.chunks(size).map(<[T]>::to_vec).collect())
    }

    pub(crate) fn join(&self, sep: &str) -> String
    where
        T: Display,
    {
        join_display(self.data.iter(), sep)
    }

    pub(crate) fn join_without_empty(&self, sep: &str) -> String
    where
        T: Display + IsZero,
    {
        join_display(self.non_empty(), sep)
    }

    pub(crate) fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.data.shuffle(rng);
    }

    pub(crate) fn each<F: FnMut(usize, &T)>(&self, mut f: F) {
        for (index, item) in self.data.iter().enumerate() {
            f(index, item);
        }
    }

    /// Replaces every element with the result of `f`. All results are computed before any element
    /// is replaced.
    pub(crate) fn every<F: FnMut(&T) -> T>(&mut self, f: F) {
        let mapped = self.data.iter().map(f).collect();
        self.data = mapped;
    }

    pub(crate) fn cast<U, F: FnMut(&T) -> U>(&self, f: F) -> Sequence<U> {
        Sequence::from_vec(self.data.iter().map(f).collect())
    }

    pub(crate) fn find_index<F: FnMut(&T) -> bool>(&self, pred: F) -> Option<usize> {
        self.data.iter().position(pred)
    }

    pub(crate) fn find_indexes<F: FnMut(&T) -> bool>(&self, mut pred: F) -> Vec<usize> {
        self.data.iter()
            .enumerate()
            .filter(|(_, item)| pred(*item))
            .map(|(index, _)| index)
            .collect()
    }

    pub(crate) fn index_of(&self, target: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.find_index(|item| item == target)
    }

    pub(crate) fn contains(&self, target: &T) -> bool
    where
        T: PartialEq,
    {
        self.data.contains(target)
    }

    /// Elements of self that also appear in `other`, in the order of self.
    pub(crate) fn intersection(&self, other: &[T]) -> Sequence<T>
    where
        T: PartialEq + Clone,
    {
        self.filtered(|item| other.contains(item))
    }

    /// Elements of self that don't appear in `other`, in the order of self. (`self \ other`)
    pub(crate) fn difference(&self, other: &[T]) -> Sequence<T>
    where
        T: PartialEq + Clone,
    {
        self.filtered(|item| !other.contains(item))
    }

    /// Every distinct element of self followed by every distinct element of `other` not already
    /// present.
    pub(crate) fn union(&self, other: &[T]) -> Sequence<T>
    where
        T: PartialEq + Clone,
    {
        let mut out: Vec<T> = Vec::with_capacity(self.len() + other.len());
        for item in self.data.iter().chain(other) {
            if !out.contains(item) {
                out.push(item.clone());
            }
        }
        Sequence::from_vec(out)
    }

    pub(crate) fn is_superset(&self, other: &[T]) -> bool
    where
        T: PartialEq,
    {
        other.iter().all(|item| self.contains(item))
    }
}

impl<T: Clone> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence::from_vec(self.data.clone())
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Debug> Debug for Sequence<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: Display> Display for Sequence<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.join(", "))
    }
}
