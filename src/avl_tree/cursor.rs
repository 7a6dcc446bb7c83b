use core::fmt;
use core::iter::FusedIterator;
use core::ptr;

use super::{AvlTree, Position};
use crate::raw::Handle;

/// A read-only bidirectional position inside an [`AvlTree`].
///
/// A cursor either rests on a value or on the end position. Stepping is circular: moving forward
/// from the largest value reaches the end, and moving forward from the end wraps to the smallest
/// value. Moving backward mirrors this, so `end().move_prev()` lands on the largest value in O(1).
///
/// # Examples
///
/// ```
/// use sentinel_avl::{AvlTree, Policy};
///
/// let tree = AvlTree::<i32>::from_values([2, 1, 3], Policy::Unique).unwrap();
///
/// let mut cursor = tree.end();
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&3));
///
/// cursor.move_next();
/// assert!(cursor.is_end());
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&1));
/// ```
pub struct Cursor<'a, T, C> {
    tree: &'a AvlTree<T, C>,
    node: Handle,
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(super) const fn new(tree: &'a AvlTree<T, C>, node: Handle) -> Self {
        Self { tree, node }
    }

    /// Returns the value under the cursor, or `None` at the end position.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.tree.get_at(Position(self.node))
    }

    /// Returns `true` if the cursor rests on the end position.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node.is_sentinel()
    }

    /// Returns a position that outlives the borrow of the tree.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position(self.node)
    }

    /// Steps to the in-order successor.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, O(1) amortized over a full traversal.
    pub fn move_next(&mut self) {
        self.node = self.tree.successor(self.node);
    }

    /// Steps to the in-order predecessor.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, O(1) from the end position.
    pub fn move_prev(&mut self) {
        self.node = self.tree.predecessor(self.node);
    }
}

impl<T, C> Clone for Cursor<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for Cursor<'_, T, C> {}

impl<T, C> PartialEq for Cursor<'_, T, C> {
    /// Cursors are equal when they rest on the same node of the same tree.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<T, C> Eq for Cursor<'_, T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// An iterator over the values of an [`AvlTree`] in ascending order.
///
/// This `struct` is created by [`AvlTree::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, C> {
    tree: &'a AvlTree<T, C>,
    front: Handle,
    back: Handle,
    remaining: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(super) fn new(tree: &'a AvlTree<T, C>) -> Self {
        Self {
            tree,
            front: tree.min,
            back: tree.max,
            remaining: tree.len,
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.tree.value(self.front);
        self.front = self.tree.successor(self.front);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.tree.value(self.back);
        self.back = self.tree.predecessor(self.back);
        Some(value)
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the values of an [`AvlTree`] in ascending order.
///
/// This `struct` is created by the [`into_iter`](IntoIterator::into_iter) method on [`AvlTree`].
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(values: alloc::vec::Vec<T>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{AvlTree, Policy};
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tree_of(values: &[i32]) -> AvlTree<i32> {
        AvlTree::from_values(values.iter().copied(), Policy::Unique).unwrap()
    }

    #[test]
    fn forward_walk_ends_then_wraps() {
        let tree = tree_of(&[2, 1, 3]);
        let mut cursor = tree.begin();
        let mut seen = Vec::new();
        while let Some(value) = cursor.get() {
            seen.push(*value);
            cursor.move_next();
        }
        assert_eq!(seen, [1, 2, 3]);
        assert!(cursor == tree.end());

        cursor.move_next();
        assert!(cursor == tree.begin());
    }

    #[test]
    fn backward_walk_from_end() {
        let tree = tree_of(&[5, 3, 8, 1, 4]);
        let mut cursor = tree.end();
        let mut seen = Vec::new();
        loop {
            cursor.move_prev();
            match cursor.get() {
                Some(value) => seen.push(*value),
                None => break,
            }
        }
        assert_eq!(seen, [8, 5, 4, 3, 1]);
    }

    #[test]
    fn empty_tree_cursors_stay_at_end() {
        let tree: AvlTree<i32> = AvlTree::new();
        let mut cursor = tree.begin();
        assert!(cursor.is_end());
        cursor.move_next();
        assert!(cursor.is_end());
        cursor.move_prev();
        assert!(cursor.is_end());
    }

    #[test]
    fn cursors_of_different_trees_differ() {
        let a = tree_of(&[1]);
        let b = tree_of(&[1]);
        assert!(a.begin() != b.begin());
        assert!(a.begin() == a.find(&1));
    }

    #[test]
    fn position_survives_other_erasures() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        let position = tree.find(&6).position();

        assert_eq!(tree.erase(&1), Some(1));
        assert_eq!(tree.erase(&2), Some(2));
        assert_eq!(tree.get_at(position), Some(&6));
        assert_eq!(tree.cursor_at(position).get(), Some(&6));
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = tree_of(&[1, 2, 3, 4]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    proptest! {
        #[test]
        fn reverse_iteration_mirrors_forward(values in prop::collection::vec(any::<i16>(), 0..300)) {
            let tree = AvlTree::<i16>::from_values(values, Policy::Multi).unwrap();
            let forward: Vec<i16> = tree.iter().copied().collect();
            let mut backward: Vec<i16> = tree.iter().rev().copied().collect();
            backward.reverse();
            prop_assert_eq!(forward, backward);
        }
    }
}
