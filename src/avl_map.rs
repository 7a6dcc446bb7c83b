use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use alloc::vec::Vec;

use crate::avl_tree::{self, AvlTree, Cursor, Policy, Position};
use crate::compare::ByKey;
use crate::error::Error;

/// An ordered map with unique keys, backed by an [`AvlTree`] of `(key, value)` pairs.
///
/// Entries are kept in ascending key order. Inserting a key that is already present keeps the
/// stored value; use [`insert_or_assign`](AvlMap::insert_or_assign) to overwrite it.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key changes while it is in the map.
///
/// # Examples
///
/// ```
/// use sentinel_avl::AvlMap;
///
/// let mut ranks = AvlMap::new();
/// ranks.insert("carol", 3).unwrap();
/// ranks.insert("alice", 1).unwrap();
/// ranks.insert("bob", 2).unwrap();
///
/// assert_eq!(ranks.get(&"bob"), Some(&2));
/// assert_eq!(ranks.keys().copied().collect::<Vec<_>>(), ["alice", "bob", "carol"]);
///
/// // The first value for a key wins...
/// let (position, inserted) = ranks.insert("bob", 20).unwrap();
/// assert!(!inserted);
/// assert_eq!(ranks.get_at(position), Some((&"bob", &2)));
/// assert_eq!(ranks[&"bob"], 2);
///
/// // ...unless it is explicitly replaced.
/// assert_eq!(ranks.insert_or_assign("bob", 20), Ok(Some(2)));
/// assert_eq!(ranks[&"bob"], 20);
/// ```
pub struct AvlMap<K, V> {
    tree: AvlTree<(K, V), ByKey>,
}

/// An iterator over the entries of an [`AvlMap`], sorted by key.
///
/// This `struct` is created by [`AvlMap::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: avl_tree::Iter<'a, (K, V), ByKey>,
}

/// An iterator over the keys of an [`AvlMap`], in ascending order.
///
/// This `struct` is created by [`AvlMap::keys`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an [`AvlMap`], in key order.
///
/// This `struct` is created by [`AvlMap::values`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of an [`AvlMap`], sorted by key.
pub type IntoIter<K, V> = avl_tree::IntoIter<(K, V)>;

impl<K, V> AvlMap<K, V> {
    /// Makes a new, empty `AvlMap`. Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::with_comparator(ByKey),
        }
    }

    /// Makes a new, empty `AvlMap` with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: AvlTree::with_capacity(capacity, ByKey),
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the most entries this map will ever hold.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Clears the map, removing all entries.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Swaps the contents of two maps in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.front().ok().map(|(key, value)| (key, value))
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.back().ok().map(|(key, value)| (key, value))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.tree.iter() }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns a cursor at the entry with the smallest key.
    pub fn begin(&self) -> Cursor<'_, (K, V), ByKey> {
        self.tree.begin()
    }

    /// Returns a cursor at the one-past-the-end position.
    pub fn end(&self) -> Cursor<'_, (K, V), ByKey> {
        self.tree.end()
    }

    /// Returns the entry at `position`, or `None` for the end position.
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        self.tree.get_at(position).map(|(key, value)| (key, value))
    }

    /// Removes the entry at `position` and returns it. The end position removes nothing.
    pub fn remove_at(&mut self, position: Position) -> Option<(K, V)> {
        self.tree.erase_at(position)
    }

    /// Returns the underlying tree.
    pub const fn as_tree(&self) -> &AvlTree<(K, V), ByKey> {
        &self.tree
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Inserts `value` under `key` if `key` is not present yet.
    ///
    /// Returns the position of the entry stored under `key` and whether it was added. If `key` is
    /// already present the stored value is kept and the given one is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the map is full.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Result<(Position, bool), Error> {
        // Duplicates are resolved before the tree's capacity check, so they never error.
        let existing = self.tree.find(&key).position();
        if !existing.is_end() {
            return Ok((existing, false));
        }
        self.tree.insert((key, value), Policy::Unique)
    }

    /// Inserts `value` under `key`, replacing and returning any value already stored there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `key` is absent and the map is full.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(core::mem::replace(slot, value)));
        }
        self.tree.insert((key, value), Policy::Unique)?;
        Ok(None)
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.find(key).get().map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.find_mut(key).map(|(_, value)| value)
    }

    /// Like [`get`](AvlMap::get), but reports a missing key as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not present.
    pub fn at(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Like [`get_mut`](AvlMap::get_mut), but reports a missing key as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not present.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a cursor at the entry stored under `key`, or the end cursor if it is absent.
    pub fn find(&self, key: &K) -> Cursor<'_, (K, V), ByKey> {
        self.tree.find(key)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Removes `key` from the map, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.erase(key).map(|(_, value)| value)
    }

    /// Inserts every entry of `entries`, keeping the first value seen for each key.
    ///
    /// Returns one [`insert`](AvlMap::insert) result per entry, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when the map fills up. Entries inserted before that stay.
    pub fn insert_many<I>(&mut self, entries: I) -> Result<Vec<(Position, bool)>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Moves every entry of `other` whose key is not in `self` into `self`, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when `self` fills up. Entries not yet moved stay in
    /// `other`.
    pub fn merge(&mut self, other: &mut Self) -> Result<(), Error> {
        self.tree.merge(&mut other.tree, Policy::Unique)
    }
}

impl<K: Ord + Clone, V: Clone> Clone for AvlMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq> Eq for AvlMap<K, V> {}

impl<K: Hash, V: Hash> Hash for AvlMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K: Ord, V> Index<&K> for AvlMap<K, V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("`AvlMap::index()` - {}", Error::KeyNotFound),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    /// Builds a map keeping the first value seen for each key.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields more distinct keys than [`max_size`](AvlMap::max_size).
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    /// # Panics
    ///
    /// Panics if the map fills up.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(error) = self.insert(key, value) {
                panic!("`AvlMap::extend()` - {error}");
            }
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for AvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        self.tree.into_iter()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}
