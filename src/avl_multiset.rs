use core::fmt;
use core::hash::{Hash, Hasher};

use alloc::vec::Vec;

use crate::avl_tree::{self, AvlTree, Cursor, Policy, Position};
use crate::compare::Natural;
use crate::error::Error;

/// An iterator over the items of an [`AvlMultiSet`] in ascending order.
pub type Iter<'a, T> = avl_tree::Iter<'a, T, Natural>;

/// An owning iterator over the items of an [`AvlMultiSet`] in ascending order.
pub type IntoIter<T> = avl_tree::IntoIter<T>;

/// An ordered collection that admits equal values, backed by an [`AvlTree`].
///
/// Equal values are kept in insertion order.
///
/// # Examples
///
/// ```
/// use sentinel_avl::AvlMultiSet;
///
/// let mut rolls = AvlMultiSet::new();
/// for roll in [4, 2, 4, 6, 4] {
///     rolls.insert(roll).unwrap();
/// }
///
/// assert_eq!(rolls.len(), 5);
/// assert_eq!(rolls.count(&4), 3);
///
/// let (mut from, to) = rolls.equal_range(&4);
/// let mut fours = 0;
/// while from != to {
///     fours += 1;
///     from.move_next();
/// }
/// assert_eq!(fours, 3);
/// ```
pub struct AvlMultiSet<T> {
    tree: AvlTree<T, Natural>,
}

impl<T> AvlMultiSet<T> {
    /// Makes a new, empty `AvlMultiSet`. Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::with_comparator(Natural),
        }
    }

    /// Makes a new, empty `AvlMultiSet` with room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: AvlTree::with_capacity(capacity, Natural),
        }
    }

    /// Returns the number of values, counting every copy.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the most values this multiset will ever hold.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Returns the smallest value (the earliest inserted among equals).
    pub fn first(&self) -> Option<&T> {
        self.tree.front().ok()
    }

    /// Returns the largest value (the latest inserted among equals).
    pub fn last(&self) -> Option<&T> {
        self.tree.back().ok()
    }

    /// Clears the multiset, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Swaps the contents of two multisets in O(1).
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

    /// Removes the value at `position` and returns it.
    pub fn remove_at(&mut self, position: Position) -> Option<T> {
        self.tree.erase_at(position)
    }

    /// Returns the underlying tree.
    pub const fn as_tree(&self) -> &AvlTree<T, Natural> {
        &self.tree
    }
}

impl<T: Ord> AvlMultiSet<T> {
    /// Adds `value` after every value equal to it, and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the multiset is full.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> Result<Position, Error> {
        let (position, _) = self.tree.insert(value, Policy::Multi)?;
        Ok(position)
    }

    /// Returns `true` if at least one value equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Returns the number of values equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(log n + k) for `k` matches.
    pub fn count(&self, value: &T) -> usize {
        let (mut from, to) = self.equal_range(value);
        let mut count = 0;
        while from != to {
            count += 1;
            from.move_next();
        }
        count
    }

    /// Returns a cursor at the first value not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Cursor<'_, T, Natural> {
        self.tree.lower_bound(value)
    }

    /// Returns a cursor at the first value greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Cursor<'_, T, Natural> {
        self.tree.upper_bound(value)
    }

    /// Returns the half-open cursor range `[lower_bound, upper_bound)` of values equal to `value`.
    pub fn equal_range(&self, value: &T) -> (Cursor<'_, T, Natural>, Cursor<'_, T, Natural>) {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Removes one value equal to `value` and returns it.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.tree.erase(value)
    }

    /// Adds every value of `values`.
    ///
    /// Returns the position of each new value in input order, paired with `true` since a multiset
    /// insert always adds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when the multiset fills up. Values inserted before that
    /// stay.
    pub fn insert_many<I>(&mut self, values: I) -> Result<Vec<(Position, bool)>, Error>
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .map(|value| self.tree.insert(value, Policy::Multi))
            .collect()
    }

    /// Moves every value of `other` into `self`, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when `self` fills up. Values not yet moved stay in
    /// `other`.
    pub fn merge(&mut self, other: &mut Self) -> Result<(), Error> {
        self.tree.merge(&mut other.tree, Policy::Multi)
    }
}

impl<T: Ord + Clone> Clone for AvlMultiSet<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T> Default for AvlMultiSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlMultiSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for AvlMultiSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for AvlMultiSet<T> {}

impl<T: Hash> Hash for AvlMultiSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<T: Ord> FromIterator<T> for AvlMultiSet<T> {
    /// # Panics
    ///
    /// Panics if the iterator yields more values than [`max_size`](AvlMultiSet::max_size).
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<T: Ord> Extend<T> for AvlMultiSet<T> {
    /// # Panics
    ///
    /// Panics if the multiset fills up.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(error) = self.insert(value) {
                panic!("`AvlMultiSet::extend()` - {error}");
            }
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlMultiSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a AvlMultiSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for AvlMultiSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}
