use core::mem::size_of;

use super::AvlTree;
use crate::raw::{Arena, Handle, Node};

// Fraction of the address space a single tree may claim, expressed as a divisor.
const SAFETY_MARGIN: usize = 20;

impl<T, C> AvlTree<T, C> {
    /// Makes a new, empty tree ordered by `comparator`, with room for at least `capacity` values
    /// before the node storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_avl::{AvlTree, Natural};
    ///
    /// let tree: AvlTree<i32> = AvlTree::with_capacity(32, Natural);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize, comparator: C) -> Self {
        let mut tree = Self::with_comparator(comparator);
        tree.nodes = Arena::with_capacity(capacity.min(Handle::MAX));
        tree
    }

    /// Returns the number of values the tree can hold without reallocating its node storage.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the most values this tree will ever hold.
    ///
    /// The ceiling is the smaller of the node index space and a fraction of the address space
    /// scaled by the size of one node. Insertion past it fails with
    /// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded).
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn max_size(&self) -> usize {
        let by_memory = isize::MAX.unsigned_abs() / size_of::<Node<T>>().max(1) / SAFETY_MARGIN;
        by_memory.min(Handle::MAX)
    }
}
