use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash};
use std::{mem, ptr};

use parking_lot::RwLock;

use super::Entry;
use crate::collections::array::{AnyArray, Sequence};
use crate::collections::dict::AnyDict;
use crate::traits::IsZero;
use crate::util::error::{InvalidChunkSize, KeyConflict, SetByIndexError};
use crate::util::result::ResultExtension;

/// The unlocked contents of an [`AnyOrderlyDict`].
///
/// `entries` and `keys` always have the same length and `keys[i] == entries[i].key` for every `i`.
/// Every method that removes from one of them removes the same positions from the other.
pub(crate) struct OrderlyState<K, V> {
    entries: Sequence<Entry<K, V>>,
    keys: Sequence<K>,
}

impl<K, V> OrderlyState<K, V> {
    fn with_cap(cap: usize) -> OrderlyState<K, V> {
        OrderlyState {
            entries: Sequence::with_cap(cap),
            keys: Sequence::with_cap(cap),
        }
    }

    fn check(&self) {
        debug_assert_eq!(
            self.entries.len(),
            self.keys.len(),
            "Ordered dictionary entries and keys out of sync!"
        );
    }

    fn len(&self) -> usize {
        self.check();
        self.entries.len()
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.keys.find_index(|candidate| Borrow::<Q>::borrow(candidate) == key)
    }

    fn values(&self) -> Sequence<&V> {
        Sequence::from_vec(self.entries.iter().map(|entry| &entry.value).collect())
    }

    fn retain_mask(&mut self, keep: &[bool]) -> usize {
        self.keys.retain_mask(keep);
        let removed = self.entries.retain_mask(keep);
        self.check();
        removed
    }

    fn retain<F: FnMut(&Entry<K, V>) -> bool>(&mut self, mut pred: F) -> usize {
        let keep: Vec<bool> = self.entries.iter().map(|entry| pred(entry)).collect();
        self.retain_mask(&keep)
    }

    fn remove_at(&mut self, index: usize) -> Option<Entry<K, V>> {
        self.keys.remove(index).ok()?;
        self.entries.remove(index).ok()
    }
}

impl<K: Clone, V> OrderlyState<K, V> {
    fn push(&mut self, key: K, value: V) {
        self.keys.push(key.clone());
        self.entries.push(Entry::new(key, value));
    }
}

impl<K: Clone, V: Clone> Clone for OrderlyState<K, V> {
    fn clone(&self) -> Self {
        OrderlyState {
            entries: self.entries.clone(),
            keys: self.keys.clone(),
        }
    }
}

/// A map that remembers the order its keys were inserted in, and can be shared between threads.
///
/// Each key is stored twice: once in the ordered list of entries and once in a parallel list of
/// keys. Both lists live behind a single read-write lock, so they are always observed together and
/// always agree. Looking a key up is a linear scan comparing keys with [`PartialEq`], which keeps
/// the requirements on `K` minimal and suits the small, configuration-sized maps the type is meant
/// for.
///
/// Overwriting the value of an existing key keeps its position. The exception is
/// [`append`](AnyOrderlyDict::append), which moves an existing key to the end.
///
/// As with [`AnyArray`], every method takes `&self`, values leave as clones, mutating methods
/// return `&Self` for chaining and closures run while the lock is held.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the AnyOrderlyDict.
/// - `m`: The number of items in the argument list.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `get` / `has` / `set_by_key` | `O(n)` |
/// | `set_by_index` | `O(n)` |
/// | `append` | `O(n)` |
/// | `first` / `last` | `O(1)` |
/// | `keys` / `values` / `all` | `O(n)` |
/// | `filter` / `unique` | `O(n)` |
/// | `remove_by_indexes` | `O(n+m)` |
/// | `remove_by_keys` / `remove_by_values` | `O(n*m)` |
pub struct AnyOrderlyDict<K, V> {
    pub(crate) inner: RwLock<OrderlyState<K, V>>,
}

impl<K: PartialEq + Clone, V> AnyOrderlyDict<K, V> {
    /// Creates a new, empty AnyOrderlyDict.
    pub fn new() -> AnyOrderlyDict<K, V> {
        AnyOrderlyDict::with_cap(0)
    }

    /// Creates an empty AnyOrderlyDict that can hold `cap` entries before reallocating.
    pub fn with_cap(cap: usize) -> AnyOrderlyDict<K, V> {
        AnyOrderlyDict::from_state(OrderlyState::with_cap(cap))
    }

    /// Creates an AnyOrderlyDict from the entries of `map`, ordered by `keys`.
    ///
    /// Keys that aren't in `map`, or that have already been used, are skipped. Entries of `map`
    /// whose key never appears in `keys` are dropped.
    ///
    /// # Examples
    /// ```
    /// # use std::collections::HashMap;
    /// # use aid_collections::collections::orderly::AnyOrderlyDict;
    /// let map = HashMap::from([("age", 18), ("score", 100)]);
    /// let dict = AnyOrderlyDict::from_map(map, ["score", "age", "name"]);
    /// assert_eq!(dict.keys(), ["score", "age"]);
    /// ```
    pub fn from_map<B, I>(mut map: HashMap<K, V, B>, keys: I) -> AnyOrderlyDict<K, V>
    where
        K: Hash + Eq,
        B: BuildHasher,
        I: IntoIterator<Item = K>,
    {
        let mut state = OrderlyState::with_cap(map.len());
        let mut skipped = 0;

        for key in keys {
            match map.remove(&key) {
                Some(value) => state.push(key, value),
                None => skipped += 1,
            }
        }

        if skipped > 0 || !map.is_empty() {
            log::debug!(
                "ordered {} entries, skipped {skipped} unknown or repeated key(s) and dropped {} unordered entries",
                state.len(),
                map.len()
            );
        }

        AnyOrderlyDict::from_state(state)
    }

    pub(crate) fn from_state(state: OrderlyState<K, V>) -> AnyOrderlyDict<K, V> {
        AnyOrderlyDict {
            inner: RwLock::new(state),
        }
    }

    /// Returns the number of entries in the AnyOrderlyDict.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the AnyOrderlyDict contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the entry at `index` with `key` and `value`, returning the entry that was there.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, or if `key` is already held by the entry at a different
    /// index. See [`try_set_by_index`](AnyOrderlyDict::try_set_by_index) for a non-panicking
    /// version.
    pub fn set_by_index(&self, index: usize, key: K, value: V) -> Entry<K, V> {
        self.try_set_by_index(index, key, value).throw()
    }

    /// Overwrites the entry at `index` with `key` and `value`, returning the entry that was there.
    ///
    /// # Errors
    /// Returns [`SetByIndexError::IndexOutOfBounds`] if `index` doesn't refer to an entry, or
    /// [`SetByIndexError::KeyConflict`] if another entry already holds `key`. The AnyOrderlyDict is
    /// unchanged in both cases.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::orderly::AnyOrderlyDict;
    /// let dict: AnyOrderlyDict<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let old = dict.try_set_by_index(0, "z", 26).unwrap();
    /// assert_eq!((old.key, old.value), ("a", 1));
    /// assert_eq!(dict.keys(), ["z", "b"]);
    /// assert!(dict.try_set_by_index(0, "b", 0).unwrap_err().is_key_conflict());
    /// ```
    pub fn try_set_by_index(&self, index: usize, key: K, value: V) -> Result<Entry<K, V>, SetByIndexError> {
        let mut state = self.inner.write();
        state.keys.check_index(index)?;

        if let Some(existing) = state.position(&key) {
            if existing != index {
                return Err(KeyConflict { index: existing }.into());
            }
        }

        let entry = Entry::new(key.clone(), value);
        state.keys.replace(index, key)?;
        Ok(state.entries.replace(index, entry)?)
    }

    /// Sets the value for `key`. An existing key keeps its position and its previous value is
    /// returned, otherwise the entry is added to the end.
    pub fn set_by_key(&self, key: K, value: V) -> Option<V> {
        let mut state = self.inner.write();
        match state.position(&key) {
            Some(index) => state.entries.get_mut(index).map(|entry| mem::replace(&mut entry.value, value)),
            None => {
                state.push(key, value);
                None
            },
        }
    }

    /// Adds an entry to the end of the AnyOrderlyDict. If `key` is already present, its old entry
    /// is removed first, so the key moves to the end.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::orderly::AnyOrderlyDict;
    /// let dict: AnyOrderlyDict<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
    /// dict.append("a", 3);
    /// assert_eq!(dict.keys(), ["b", "a"]);
    /// assert_eq!(dict.get("a"), Some(3));
    /// ```
    pub fn append(&self, key: K, value: V) -> &Self {
        let mut state = self.inner.write();
        if let Some(index) = state.position(&key) {
            state.remove_at(index);
            log::trace!("moved existing key from index {index} to the end");
        }
        state.push(key, value);
        self
    }

    /// Returns a clone of the value for `key`, or None if it isn't present.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
        V: Clone,
    {
        let state = self.inner.read();
        state.position(key)
            .and_then(|index| state.entries.get(index))
            .map(|entry| entry.value.clone())
    }

    /// Returns true if the AnyOrderlyDict has an entry for `key`.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.inner.read().position(key).is_some()
    }

    /// Alias of [`has`](AnyOrderlyDict::has).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.has(key)
    }

    pub fn not_contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        !self.has(key)
    }

    /// Returns true if any entry has a value equal to `target`.
    pub fn contains_value(&self, target: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.read().entries.iter().any(|entry| entry.value == *target)
    }

    pub fn not_contains_value(&self, target: &V) -> bool
    where
        V: PartialEq,
    {
        !self.contains_value(target)
    }

    /// Returns a clone of the first entry, or None if the AnyOrderlyDict is empty.
    pub fn first(&self) -> Option<Entry<K, V>>
    where
        V: Clone,
    {
        self.inner.read().entries.first().cloned()
    }

    /// Returns a clone of the last entry, or None if the AnyOrderlyDict is empty.
    pub fn last(&self) -> Option<Entry<K, V>>
    where
        V: Clone,
    {
        self.inner.read().entries.last().cloned()
    }

    pub fn first_key(&self) -> Option<K> {
        self.inner.read().keys.first().cloned()
    }

    pub fn last_key(&self) -> Option<K> {
        self.inner.read().keys.last().cloned()
    }

    pub fn first_value(&self) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().entries.first().map(|entry| entry.value.clone())
    }

    pub fn last_value(&self) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().entries.last().map(|entry| entry.value.clone())
    }

    /// Returns a copy of the keys, in order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys.to_vec()
    }

    /// Returns a copy of the values, in key order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().entries.iter().map(|entry| entry.value.clone()).collect()
    }

    /// Returns a copy of every entry, in order.
    pub fn all(&self) -> Vec<Entry<K, V>>
    where
        V: Clone,
    {
        self.inner.read().entries.to_vec()
    }

    /// Copies the entries into a HashMap, losing their order.
    pub fn to_map(&self) -> HashMap<K, V>
    where
        K: Hash + Eq,
        V: Clone,
    {
        self.inner.read()
            .entries
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Copies the entries into an [`AnyDict`], losing their order.
    pub fn to_any_dict(&self) -> AnyDict<K, V>
    where
        K: Hash + Eq,
        V: Clone,
    {
        AnyDict::from_map(self.to_map())
    }

    /// Copies the values into an [`AnyArray`], in key order.
    pub fn to_any_array(&self) -> AnyArray<V>
    where
        V: Clone,
    {
        AnyArray::from_sequence(self.inner.read().entries.cast(|entry| entry.value.clone()))
    }

    /// Keeps only the entries for which `pred` returns true, without changing their order.
    pub fn filter<F: FnMut(&Entry<K, V>) -> bool>(&self, pred: F) -> &Self {
        let removed = self.inner.write().retain(pred);
        log::trace!("filter dropped {removed} entries");
        self
    }

    /// Removes every entry whose value [is zero](IsZero).
    pub fn remove_empty(&self) -> &Self
    where
        V: IsZero,
    {
        self.inner.write().retain(|entry| !entry.value.is_zero());
        self
    }

    /// Removes the entries at each of `indexes`, as they were before any removal. Out of range and
    /// repeated indexes are ignored.
    pub fn remove_by_indexes(&self, indexes: &[usize]) -> &Self {
        let mut state = self.inner.write();
        let (keep, ignored) = state.keys.keep_mask(indexes);
        if ignored > 0 {
            log::debug!("ignored {ignored} out of range or repeated index(es) while removing from {} entries", state.len());
        }
        state.retain_mask(&keep);
        self
    }

    /// Removes the entries for each of `keys`. Keys that aren't present are ignored.
    pub fn remove_by_keys<Q>(&self, keys: &[Q]) -> &Self
    where
        K: Borrow<Q>,
        Q: PartialEq,
    {
        self.inner.write().retain(|entry| !keys.contains(Borrow::<Q>::borrow(&entry.key)));
        self
    }

    /// Removes every entry whose value equals one of `targets`.
    pub fn remove_by_values(&self, targets: &[V]) -> &Self
    where
        V: PartialEq,
    {
        self.inner.write().retain(|entry| !targets.contains(&entry.value));
        self
    }

    /// Removes entries with repeated values, keeping the first entry for each distinct value.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::orderly::AnyOrderlyDict;
    /// let dict: AnyOrderlyDict<_, _> = [("a", 1), ("b", 2), ("c", 1)].into_iter().collect();
    /// dict.unique();
    /// assert_eq!(dict.keys(), ["a", "b"]);
    /// ```
    pub fn unique(&self) -> &Self
    where
        V: Hash + Eq + Clone,
    {
        self.unique_by_key(V::clone)
    }

    /// Removes entries whose value maps to a key already produced by an earlier entry.
    pub fn unique_by_key<Q, F>(&self, mut key: F) -> &Self
    where
        Q: Hash + Eq,
        F: FnMut(&V) -> Q,
    {
        let mut state = self.inner.write();
        let mut seen = HashSet::with_capacity(state.len());
        let removed = state.retain(|entry| seen.insert(key(&entry.value)));
        log::trace!("unique removed {removed} entries with repeated values");
        self
    }

    /// Splits the values into groups of `size`, in key order. The last group may be smaller.
    ///
    /// # Errors
    /// Returns [`InvalidChunkSize`] if `size` is 0.
    pub fn chunk(&self, size: usize) -> Result<Vec<Vec<V>>, InvalidChunkSize>
    where
        V: Clone,
    {
        let state = self.inner.read();
        Ok(state.values().chunk(size)?
            .into_iter()
            .map(|chunk| chunk.into_iter().cloned().collect())
            .collect())
    }

    /// Joins the [`Display`] form of every value with `sep`, in key order.
    pub fn join(&self, sep: &str) -> String
    where
        V: Display,
    {
        self.inner.read().values().join(sep)
    }

    /// Like [`join`](AnyOrderlyDict::join), but skips values that [are zero](IsZero).
    pub fn join_without_empty(&self, sep: &str) -> String
    where
        V: Display + IsZero,
    {
        self.inner.read().values().join_without_empty(sep)
    }

    /// Returns true if every value [is zero](IsZero). True for an empty AnyOrderlyDict.
    pub fn all_empty(&self) -> bool
    where
        V: IsZero,
    {
        self.inner.read().values().all_empty()
    }

    /// Returns true if at least one value [is zero](IsZero).
    pub fn any_empty(&self) -> bool
    where
        V: IsZero,
    {
        self.inner.read().values().any_empty()
    }

    /// Returns true if no value [is zero](IsZero). True for an empty AnyOrderlyDict.
    pub fn all_not_empty(&self) -> bool
    where
        V: IsZero,
    {
        !self.any_empty()
    }

    /// Replaces every value with the result of `f`, keeping keys and order. All results are
    /// computed before any value is replaced.
    pub fn every<F: FnMut(&V) -> V>(&self, mut f: F) -> &Self {
        let mut state = self.inner.write();
        let mapped: Vec<V> = state.entries.iter().map(|entry| f(&entry.value)).collect();
        for (entry, value) in state.entries.data.iter_mut().zip(mapped) {
            entry.value = value;
        }
        self
    }

    /// Calls `f` with the position, key and value of every entry, in order.
    pub fn each<F: FnMut(usize, &K, &V)>(&self, mut f: F) -> &Self {
        self.inner.read().entries.each(|index, entry| f(index, &entry.key, &entry.value));
        self
    }

    /// Returns a new AnyOrderlyDict with the same keys, in the same order, and the result of `f`
    /// for each value.
    pub fn cast<U, F: FnMut(&V) -> U>(&self, mut f: F) -> AnyOrderlyDict<K, U> {
        let state = self.inner.read();
        AnyOrderlyDict::from_state(OrderlyState {
            entries: state.entries.cast(|entry| Entry::new(entry.key.clone(), f(&entry.value))),
            keys: state.keys.clone(),
        })
    }

    /// Removes every entry.
    pub fn clear(&self) -> &Self {
        let mut state = self.inner.write();
        state.entries.clear();
        state.keys.clear();
        self
    }

    /// Consumes the AnyOrderlyDict, returning its entries in order.
    pub fn into_entries(self) -> Vec<Entry<K, V>> {
        self.inner.into_inner().entries.into_vec()
    }
}

impl<K: Clone, V: Clone> Clone for AnyOrderlyDict<K, V> {
    fn clone(&self) -> Self {
        AnyOrderlyDict {
            inner: RwLock::new(self.inner.read().clone()),
        }
    }
}

/// Two AnyOrderlyDicts are equal when they hold equal entries in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for AnyOrderlyDict<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        // Locks are taken in address order, so opposing comparisons can't wait on each other.
        let lhs;
        let rhs;
        if ptr::from_ref(self) < ptr::from_ref(other) {
            lhs = self.inner.read();
            rhs = other.inner.read();
        } else {
            rhs = other.inner.read();
            lhs = self.inner.read();
        }
        lhs.entries == rhs.entries
    }
}

impl<K: Eq, V: Eq> Eq for AnyOrderlyDict<K, V> {}

impl<K: PartialEq + Clone, V> Default for AnyOrderlyDict<K, V> {
    fn default() -> Self {
        AnyOrderlyDict::new()
    }
}

/// Later pairs with a repeated key update the value in place, like
/// [`set_by_key`](AnyOrderlyDict::set_by_key).
impl<K: PartialEq + Clone, V> FromIterator<(K, V)> for AnyOrderlyDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let dict = AnyOrderlyDict::new();
        for (key, value) in iter {
            dict.set_by_key(key, value);
        }
        dict
    }
}

impl<K: PartialEq + Clone, V> Extend<(K, V)> for AnyOrderlyDict<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set_by_key(key, value);
        }
    }
}

impl<K, V> IntoIterator for AnyOrderlyDict<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = std::vec::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_inner().entries.into_vec().into_iter()
    }
}

impl<K: Debug, V: Debug> Debug for AnyOrderlyDict<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.inner.read();
        f.debug_struct("AnyOrderlyDict")
            .field(
                "data",
                &DebugEntries(&state.entries),
            )
            .field("len", &state.len())
            .finish()
    }
}

impl<K: Debug, V: Debug> Display for AnyOrderlyDict<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        Debug::fmt(&DebugEntries(&self.inner.read().entries), f)
    }
}

struct DebugEntries<'a, K, V>(&'a Sequence<Entry<K, V>>);

impl<K: Debug, V: Debug> Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|entry| (&entry.key, &entry.value)))
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for AnyOrderlyDict<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let state = self.inner.read();
        serializer.collect_map(state.entries.iter().map(|entry| (&entry.key, &entry.value)))
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for AnyOrderlyDict<K, V>
where
    K: serde::Deserialize<'de> + PartialEq + Clone,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderlyVisitor(std::marker::PhantomData))
    }
}

#[cfg(feature = "serde")]
struct OrderlyVisitor<K, V>(std::marker::PhantomData<fn() -> (K, V)>);

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for OrderlyVisitor<K, V>
where
    K: serde::Deserialize<'de> + PartialEq + Clone,
    V: serde::Deserialize<'de>,
{
    type Value = AnyOrderlyDict<K, V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map")
    }

    fn visit_map<A: serde::de::MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let dict = AnyOrderlyDict::with_cap(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            dict.set_by_key(key, value);
        }
        Ok(dict)
    }
}
