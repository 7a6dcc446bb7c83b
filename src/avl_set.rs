use core::fmt;
use core::hash::{Hash, Hasher};

use alloc::vec::Vec;

use crate::avl_tree::{self, AvlTree, Cursor, Policy, Position};
use crate::compare::Natural;
use crate::error::Error;

/// An iterator over the items of an [`AvlSet`] in ascending order.
pub type Iter<'a, T> = avl_tree::Iter<'a, T, Natural>;

/// An owning iterator over the items of an [`AvlSet`] in ascending order.
pub type IntoIter<T> = avl_tree::IntoIter<T>;

/// An ordered set of unique values, backed by an [`AvlTree`].
///
/// # Examples
///
/// ```
/// use sentinel_avl::AvlSet;
///
/// let mut books = AvlSet::new();
/// books.insert("Grimms' Fairy Tales").unwrap();
/// let (odyssey, inserted) = books.insert("The Odyssey").unwrap();
/// assert!(inserted);
/// assert_eq!(books.insert("The Odyssey"), Ok((odyssey, false)));
///
/// assert!(books.contains(&"The Odyssey"));
/// assert_eq!(books.first(), Some(&"Grimms' Fairy Tales"));
/// assert_eq!(books.len(), 2);
/// ```
pub struct AvlSet<T> {
    tree: AvlTree<T, Natural>,
}

impl<T> AvlSet<T> {
    /// Makes a new, empty `AvlSet`. Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::with_comparator(Natural),
        }
    }

    /// Makes a new, empty `AvlSet` with room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: AvlTree::with_capacity(capacity, Natural),
        }
    }

    /// Returns the number of values in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the most values this set will ever hold.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Returns the smallest value.
    pub fn first(&self) -> Option<&T> {
        self.tree.front().ok()
    }

    /// Returns the largest value.
    pub fn last(&self) -> Option<&T> {
        self.tree.back().ok()
    }

    /// Removes and returns the smallest value.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_front()
    }

    /// Removes and returns the largest value.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_back()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Swaps the contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Gets an iterator that visits the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Returns a cursor at the smallest value.
    pub fn begin(&self) -> Cursor<'_, T, Natural> {
        self.tree.begin()
    }

    /// Returns a cursor at the one-past-the-end position.
    pub fn end(&self) -> Cursor<'_, T, Natural> {
        self.tree.end()
    }

    /// Returns the value at `position`, or `None` for the end position.
    pub fn get_at(&self, position: Position) -> Option<&T> {
        self.tree.get_at(position)
    }

    /// Removes the value at `position` and returns it. The end position removes nothing.
    pub fn remove_at(&mut self, position: Position) -> Option<T> {
        self.tree.erase_at(position)
    }

    /// Returns the underlying tree.
    pub const fn as_tree(&self) -> &AvlTree<T, Natural> {
        &self.tree
    }
}

impl<T: Ord> AvlSet<T> {
    /// Adds `value` to the set. Returns the position of the stored value and whether `value` was
    /// added; an equal value already present is kept and `value` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the set is full.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> Result<(Position, bool), Error> {
        // Duplicates are resolved before the tree's capacity check, so they never error.
        let existing = self.tree.find(&value).position();
        if !existing.is_end() {
            return Ok((existing, false));
        }
        self.tree.insert(value, Policy::Unique)
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Returns the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.find(value).get()
    }

    /// Returns a cursor at `value`, or the end cursor if it is absent.
    pub fn find(&self, value: &T) -> Cursor<'_, T, Natural> {
        self.tree.find(value)
    }

    /// Removes `value` from the set. Returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.erase(value)
    }

    /// Adds every value of `values`, skipping ones already present.
    ///
    /// Returns one [`insert`](AvlSet::insert) result per value, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when the set fills up. Values inserted before that stay.
    pub fn insert_many<I>(&mut self, values: I) -> Result<Vec<(Position, bool)>, Error>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(|value| self.insert(value)).collect()
    }

    /// Moves every value of `other` into `self`, leaving `other` empty. Values already in `self`
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when `self` fills up. Values not yet moved stay in
    /// `other`.
    pub fn merge(&mut self, other: &mut Self) -> Result<(), Error> {
        self.tree.merge(&mut other.tree, Policy::Unique)
    }
}

impl<T: Ord + Clone> Clone for AvlSet<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for AvlSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for AvlSet<T> {}

impl<T: Hash> Hash for AvlSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<T: Ord> FromIterator<T> for AvlSet<T> {
    /// # Panics
    ///
    /// Panics if the iterator yields more distinct values than [`max_size`](AvlSet::max_size).
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlSet<T> {
    /// # Panics
    ///
    /// Panics if the set fills up.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(error) = self.insert(value) {
                panic!("`AvlSet::extend()` - {error}");
            }
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}
