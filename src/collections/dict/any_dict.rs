use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash, RandomState};
use std::ptr;

use parking_lot::RwLock;

use crate::collections::array::Sequence;
use crate::traits::IsZero;

/// A map of keys to values that can be shared between threads, backed by a [`HashMap`].
///
/// Iteration order is unspecified: methods like [`keys`](AnyDict::keys), [`values`](AnyDict::values)
/// and [`join`](AnyDict::join) may return entries in any order, and that order can change between
/// calls. Use [`AnyOrderlyDict`](crate::collections::orderly::AnyOrderlyDict) when insertion order
/// matters.
///
/// Like [`AnyArray`](crate::collections::array::AnyArray), every method holds an internal
/// read-write lock for its full duration, values leave as clones, and mutating methods return
/// `&Self` for chaining. Closures run while the lock is held and must not call back into the same
/// AnyDict.
///
/// Searches by value compare with [`PartialEq`] and visit every entry.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the AnyDict.
/// - `m`: The number of keys or values passed as an argument.
///
/// | Method | Complexity |
/// |-|-|
/// | `set` / `get` / `has` / `remove_by_key` | `O(1)`* |
/// | `remove_by_keys` / `values_by_keys` | `O(m)`* |
/// | `remove_by_value` / `key_by_value` | `O(n)` |
/// | `remove_by_values` / `keys_by_values` | `O(n*m)` |
/// | `keys` / `values` / `to_map` | `O(n)` |
///
/// \* Expected, see [`HashMap`].
pub struct AnyDict<K, V, B = RandomState> {
    pub(crate) inner: RwLock<HashMap<K, V, B>>,
}

impl<K: Hash + Eq, V, B: BuildHasher + Default> AnyDict<K, V, B> {
    /// Creates a new, empty AnyDict with the default hasher.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::dict::AnyDict;
    /// let dict: AnyDict<String, u32> = AnyDict::new();
    /// assert!(dict.is_empty());
    /// ```
    pub fn new() -> AnyDict<K, V, B> {
        AnyDict::from_map(HashMap::default())
    }

    /// Creates a new, empty AnyDict with room for `cap` entries before reallocating.
    pub fn with_cap(cap: usize) -> AnyDict<K, V, B> {
        AnyDict::from_map(HashMap::with_capacity_and_hasher(cap, B::default()))
    }

    /// Creates an AnyDict by pairing up `keys` with `values`, stopping at the end of the shorter
    /// of the two. Later duplicate keys overwrite earlier ones.
    ///
    /// # Examples
    /// ```
    /// # use aid_collections::collections::dict::AnyDict;
    /// let dict: AnyDict<_, _> = AnyDict::zip(["a", "b", "c"], [1, 2]);
    /// assert_eq!(dict.len(), 2);
    /// assert_eq!(dict.get("b"), Some(2));
    /// ```
    pub fn zip<IK, IV>(keys: IK, values: IV) -> AnyDict<K, V, B>
    where
        IK: IntoIterator<Item = K>,
        IV: IntoIterator<Item = V>,
    {
        keys.into_iter().zip(values).collect()
    }
}

impl<K: Hash + Eq, V, B: BuildHasher> AnyDict<K, V, B> {
    /// Wraps an existing HashMap without copying it.
    pub fn from_map(map: HashMap<K, V, B>) -> AnyDict<K, V, B> {
        AnyDict {
            inner: RwLock::new(map),
        }
    }

    /// Creates a new, empty AnyDict with the provided `hasher`.
    pub fn with_hasher(hasher: B) -> AnyDict<K, V, B> {
        AnyDict::from_map(HashMap::with_hasher(hasher))
    }

    /// Creates a new, empty AnyDict with the provided `cap`acity and `hasher`.
    pub fn with_cap_and_hasher(cap: usize, hasher: B) -> AnyDict<K, V, B> {
        AnyDict::from_map(HashMap::with_capacity_and_hasher(cap, hasher))
    }

    /// Returns the number of entries in the AnyDict.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the AnyDict contains no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Associates `value` with `key`, returning the previous value if there was one.
    ///
    /// As with [`HashMap::insert`], the stored key isn't replaced if it already exists.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Returns a clone of the value associated with `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Returns true if there is a value associated with `key`.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    /// Removes the entry for `key`, returning its value if it existed.
    pub fn remove_by_key<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Removes the entries for each of `keys`, returning how many entries were removed.
    pub fn remove_by_keys<Q>(&self, keys: &[Q]) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let mut map = self.inner.write();
        keys.iter()
            .filter(|key| map.remove(*key).is_some())
            .count()
    }

    /// Removes every entry whose value is equal to `target`, returning how many were removed.
    pub fn remove_by_value(&self, target: &V) -> usize
    where
        V: PartialEq,
    {
        self.remove_by_values(std::slice::from_ref(target))
    }

    /// Removes every entry whose value is equal to any of `targets`, returning how many were
    /// removed.
    pub fn remove_by_values(&self, targets: &[V]) -> usize
    where
        V: PartialEq,
    {
        retain_counted(&mut self.inner.write(), |_, value| !targets.contains(value))
    }

    /// Returns a new AnyDict with clones of the entries for which `pred` returns true. Self is
    /// unchanged. The new AnyDict uses a clone of this one's hasher.
    pub fn filter<F>(&self, mut pred: F) -> AnyDict<K, V, B>
    where
        K: Clone,
        V: Clone,
        B: Clone,
        F: FnMut(&K, &V) -> bool,
    {
        let map = self.inner.read();
        let mut out = HashMap::with_hasher(map.hasher().clone());
        for (key, value) in map.iter() {
            if pred(key, value) {
                out.insert(key.clone(), value.clone());
            }
        }
        AnyDict::from_map(out)
    }

    /// Keeps only the entries for which `pred` returns true.
    pub fn retain<F: FnMut(&K, &V) -> bool>(&self, pred: F) -> &Self {
        let removed = retain_counted(&mut self.inner.write(), pred);
        log::trace!("retain dropped {removed} entries");
        self
    }

    /// Removes every entry whose value [is zero](IsZero).
    pub fn remove_empty(&self) -> &Self
    where
        V: IsZero,
    {
        retain_counted(&mut self.inner.write(), |_, value| !value.is_zero());
        self
    }

    /// Returns clones of every key, in no particular order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().keys().cloned().collect()
    }

    /// Returns clones of every value, in no particular order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().values().cloned().collect()
    }

    /// Returns a key whose value is equal to `target`. If several keys match, which one is
    /// returned is unspecified.
    pub fn key_by_value(&self, target: &V) -> Option<K>
    where
        K: Clone,
        V: PartialEq,
    {
        self.inner.read()
            .iter()
            .find(|(_, value)| *value == target)
            .map(|(key, _)| key.clone())
    }

    /// Returns every key whose value is equal to any of `targets`.
    pub fn keys_by_values(&self, targets: &[V]) -> Vec<K>
    where
        K: Clone,
        V: PartialEq,
    {
        self.inner.read()
            .iter()
            .filter(|(_, value)| targets.contains(value))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns clones of the values for each of `keys` that is present, in the order given.
    pub fn values_by_keys<Q>(&self, keys: &[Q]) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
        V: Clone,
    {
        let map = self.inner.read();
        keys.iter()
            .filter_map(|key| map.get(key).cloned())
            .collect()
    }

    /// Returns true if every one of `keys` is present.
    pub fn contains_keys<Q>(&self, keys: &[Q]) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let map = self.inner.read();
        keys.iter().all(|key| map.contains_key(key))
    }

    /// Returns true if at least one of `keys` is missing.
    pub fn not_contains_keys<Q>(&self, keys: &[Q]) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        !self.contains_keys(keys)
    }

    /// Returns true if every one of `targets` is the value of some entry.
    pub fn contains_values(&self, targets: &[V]) -> bool
    where
        V: PartialEq,
    {
        let map = self.inner.read();
        targets.iter().all(|target| map.values().any(|value| value == target))
    }

    /// Returns true if at least one of `targets` isn't the value of any entry.
    pub fn not_contains_values(&self, targets: &[V]) -> bool
    where
        V: PartialEq,
    {
        !self.contains_values(targets)
    }

    /// Returns true if every value [is zero](IsZero), including when there are no entries.
    pub fn all_empty(&self) -> bool
    where
        V: IsZero,
    {
        values_of(&self.inner.read()).all_empty()
    }

    /// Returns true if at least one value [is zero](IsZero).
    pub fn any_empty(&self) -> bool
    where
        V: IsZero,
    {
        values_of(&self.inner.read()).any_empty()
    }

    /// Returns true if no value [is zero](IsZero). True for an empty AnyDict.
    pub fn all_not_empty(&self) -> bool
    where
        V: IsZero,
    {
        !self.any_empty()
    }

    /// Formats every value with [`Display`] and joins them with `sep`, in no particular order.
    pub fn join(&self, sep: &str) -> String
    where
        V: Display,
    {
        values_of(&self.inner.read()).join(sep)
    }

    /// Like [`join`](AnyDict::join), but skips values that [are zero](IsZero).
    pub fn join_without_empty(&self, sep: &str) -> String
    where
        V: Display + IsZero,
    {
        values_of(&self.inner.read()).join_without_empty(sep)
    }

    /// Calls `f` with every entry.
    pub fn each<F: FnMut(&K, &V)>(&self, mut f: F) -> &Self {
        for (key, value) in self.inner.read().iter() {
            f(key, value);
        }
        self
    }

    /// Replaces every value with the result of `f`. All results are computed before any value is
    /// replaced.
    pub fn every<F: FnMut(&K, &V) -> V>(&self, mut f: F) -> &Self {
        let mut map = self.inner.write();
        let updated: Vec<V> = map.iter().map(|(key, value)| f(key, value)).collect();
        // Iteration order is stable while the map isn't modified.
        for (slot, value) in map.values_mut().zip(updated) {
            *slot = value;
        }
        self
    }

    /// Creates a new AnyDict with the same keys and the values produced by `f`.
    pub fn cast<U, F>(&self, mut f: F) -> AnyDict<K, U, B>
    where
        K: Clone,
        B: Clone,
        F: FnMut(&K, &V) -> U,
    {
        let map = self.inner.read();
        let mut out = HashMap::with_capacity_and_hasher(map.len(), map.hasher().clone());
        for (key, value) in map.iter() {
            out.insert(key.clone(), f(key, value));
        }
        AnyDict::from_map(out)
    }

    /// Returns a copy of the entries as a HashMap. Changing the returned map has no effect on the
    /// AnyDict.
    pub fn to_map(&self) -> HashMap<K, V, B>
    where
        K: Clone,
        V: Clone,
        B: Clone,
    {
        self.inner.read().clone()
    }

    /// Consumes the AnyDict, returning the backing HashMap without copying.
    pub fn into_map(self) -> HashMap<K, V, B> {
        self.inner.into_inner()
    }

    /// Removes every entry.
    pub fn clear(&self) -> &Self {
        self.inner.write().clear();
        self
    }
}

/// Borrows every value of `map` as a [`Sequence`], so that value-only operations can reuse its
/// algorithms.
fn values_of<K, V, B>(map: &HashMap<K, V, B>) -> Sequence<&V> {
    Sequence::from_vec(map.values().collect())
}

fn retain_counted<K, V, B, F>(map: &mut HashMap<K, V, B>, mut pred: F) -> usize
where
    F: FnMut(&K, &V) -> bool,
{
    let before = map.len();
    map.retain(|key, value| pred(key, value));
    before - map.len()
}

impl<K: Clone, V: Clone, B: Clone> Clone for AnyDict<K, V, B> {
    /// Creates an independent AnyDict with clones of every entry.
    fn clone(&self) -> Self {
        AnyDict {
            inner: RwLock::new(self.inner.read().clone()),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq, B: BuildHasher> PartialEq for AnyDict<K, V, B> {
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
        *lhs == *rhs
    }
}

impl<K: Hash + Eq, V: Eq, B: BuildHasher> Eq for AnyDict<K, V, B> {}

impl<K: Hash + Eq, V, B: BuildHasher + Default> Default for AnyDict<K, V, B> {
    fn default() -> Self {
        AnyDict::new()
    }
}

impl<K: Hash + Eq, V, B: BuildHasher> From<HashMap<K, V, B>> for AnyDict<K, V, B> {
    fn from(value: HashMap<K, V, B>) -> Self {
        AnyDict::from_map(value)
    }
}

impl<K: Hash + Eq, V, B: BuildHasher + Default> FromIterator<(K, V)> for AnyDict<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AnyDict::from_map(iter.into_iter().collect())
    }
}

impl<K: Hash + Eq, V, B: BuildHasher> Extend<(K, V)> for AnyDict<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.inner.get_mut().extend(iter);
    }
}

impl<K, V, B> IntoIterator for AnyDict<K, V, B> {
    type Item = (K, V);

    type IntoIter = std::collections::hash_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_inner().into_iter()
    }
}

impl<K: Debug, V: Debug, B> Debug for AnyDict<K, V, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let map = self.inner.read();
        f.debug_struct("AnyDict")
            .field("data", &*map)
            .field("len", &map.len())
            .finish()
    }
}

impl<K: Debug, V: Debug, B> Display for AnyDict<K, V, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        f.debug_map().entries(self.inner.read().iter()).finish()
    }
}

#[cfg(feature = "serde")]
impl<K, V, B> serde::Serialize for AnyDict<K, V, B>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.inner.read().iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, B> serde::Deserialize<'de> for AnyDict<K, V, B>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
    B: BuildHasher + Default,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <HashMap<K, V, B> as serde::Deserialize<'de>>::deserialize(deserializer)
            .map(AnyDict::from_map)
    }
}
