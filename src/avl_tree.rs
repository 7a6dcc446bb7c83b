use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;

use smallvec::SmallVec;

use crate::compare::{Comparator, Natural};
use crate::error::Error;
use crate::raw::{Arena, Handle, Header, Node, Side};

mod capacity;
mod cursor;

pub use cursor::{Cursor, IntoIter, Iter};

/// Whether an insertion may add a value that compares equal to one already present.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Policy {
    /// Reject the new value and report the existing one.
    #[default]
    Unique,
    /// Accept it. Equal values keep their insertion order.
    Multi,
}

/// A stable reference to a node of one particular tree, or to its end.
///
/// Positions are returned by insertion and by [`Cursor::position`]. Erasing the node a position
/// refers to invalidates that position (and only that one). Using a position with a tree other than
/// the one that produced it, or after its node was erased, is a logic error: the result is
/// unspecified but memory-safe, and may be a panic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(pub(crate) Handle);

impl Position {
    /// Returns `true` if this is the one-past-the-end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_sentinel()
    }
}

/// The parent-side link that currently holds a subtree root.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Root,
    Child(Handle, Side),
}

/// An ordered collection backed by an AVL tree with a sentinel node.
///
/// Values are ordered by a [`Comparator`], which projects a key out of every value and compares keys
/// three ways. Whether equal keys may coexist is decided per insertion by a [`Policy`], so the same
/// engine backs [`AvlMap`](crate::AvlMap), [`AvlSet`](crate::AvlSet) and
/// [`AvlMultiSet`](crate::AvlMultiSet).
///
/// Every missing child link points at a single per-tree sentinel, which is also the end position.
/// The sentinel's parent link caches the maximum node, so stepping back from the end is O(1), and
/// the minimum and maximum nodes are cached for O(1) [`front`](AvlTree::front) and
/// [`back`](AvlTree::back).
///
/// # Examples
///
/// ```
/// use sentinel_avl::{AvlTree, Policy};
///
/// let mut tree: AvlTree<i32> = AvlTree::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value, Policy::Unique).unwrap();
/// }
///
/// let (_, inserted) = tree.insert(5, Policy::Unique).unwrap();
/// assert!(!inserted);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
///
/// assert_eq!(tree.erase(&5), Some(5));
/// assert_eq!(tree.front(), Ok(&1));
/// assert_eq!(tree.back(), Ok(&9));
/// ```
pub struct AvlTree<T, C = Natural> {
    nodes: Arena<Node<T>>,
    sentinel: Header,
    root: Handle,
    min: Handle,
    max: Handle,
    len: usize,
    comparator: C,
}

impl<T, C> AvlTree<T, C> {
    /// Makes a new, empty tree ordered by `comparator`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            sentinel: Header::sentinel(),
            root: Handle::SENTINEL,
            min: Handle::SENTINEL,
            max: Handle::SENTINEL,
            len: 0,
            comparator,
        }
    }

    /// Makes a new, empty tree.
    #[must_use]
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Returns the number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the comparator ordering this tree.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single value.
    ///
    /// An AVL tree holding `n` values never exceeds roughly `1.44 * log2(n + 2)`.
    #[must_use]
    pub fn height(&self) -> usize {
        self.header(self.root).height() as usize
    }

    /// Returns the smallest value, or [`Error::Empty`].
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn front(&self) -> Result<&T, Error> {
        if self.min.is_sentinel() {
            return Err(Error::Empty);
        }
        Ok(self.value(self.min))
    }

    /// Returns the largest value (the last one among equals), or [`Error::Empty`].
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn back(&self) -> Result<&T, Error> {
        if self.max.is_sentinel() {
            return Err(Error::Empty);
        }
        Ok(self.value(self.max))
    }

    /// Returns a cursor at the smallest value, or at the end if the tree is empty.
    pub fn begin(&self) -> Cursor<'_, T, C> {
        Cursor::new(self, self.min)
    }

    /// Returns a cursor at the one-past-the-end position.
    pub fn end(&self) -> Cursor<'_, T, C> {
        Cursor::new(self, Handle::SENTINEL)
    }

    /// Returns a cursor at `position`.
    pub fn cursor_at(&self, position: Position) -> Cursor<'_, T, C> {
        Cursor::new(self, position.0)
    }

    /// Returns the value at `position`, or `None` for the end position.
    pub fn get_at(&self, position: Position) -> Option<&T> {
        self.nodes.try_get(position.0).map(Node::value)
    }

    /// Gets an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self)
    }

    /// Removes every value. The sentinel survives and loops back to itself.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        log::debug!("clearing {} values", self.len);

        // Explicit work-list: teardown depth never depends on tree shape.
        let mut pending: SmallVec<[Handle; 32]> = SmallVec::new();
        if !self.root.is_sentinel() {
            pending.push(self.root);
        }
        while let Some(handle) = pending.pop() {
            let node = self.nodes.take(handle);
            for child in [node.header().left(), node.header().right()] {
                if !child.is_sentinel() {
                    pending.push(child);
                }
            }
        }

        self.nodes.clear();
        self.reset();
    }

    /// Swaps the contents of two trees in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Removes the value at `position` and returns it. Returns `None` for the end position.
    ///
    /// A node with two children takes over its in-order predecessor's value, and the predecessor's
    /// node is the one physically unlinked. Afterwards `position` may refer to the value that moved
    /// in, and positions of the moved value are invalidated. All other positions stay valid.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase_at(&mut self, position: Position) -> Option<T> {
        let mut target = position.0;
        if target.is_sentinel() {
            return None;
        }

        // Sink the doomed value down to a leaf. A node with a single child has a leaf child, and the
        // predecessor of a two-child node has no right child, so this runs at most twice.
        loop {
            let header = *self.header(target);
            let replacement = match (header.left().is_sentinel(), header.right().is_sentinel()) {
                (false, false) => self.rightmost(header.left()),
                (false, true) => header.left(),
                (true, false) => header.right(),
                (true, true) => break,
            };
            let (held, moved) = self.nodes.get_pair_mut(target, replacement);
            mem::swap(held.value_mut(), moved.value_mut());
            target = replacement;
        }

        Some(self.unlink_leaf(target))
    }

    /// Removes and returns the smallest value.
    pub fn pop_front(&mut self) -> Option<T> {
        self.erase_at(Position(self.min))
    }

    /// Removes and returns the largest value.
    pub fn pop_back(&mut self) -> Option<T> {
        self.erase_at(Position(self.max))
    }

    /// Moves every value out in ascending order, leaving the tree empty.
    pub(crate) fn drain_sorted(&mut self) -> alloc::vec::Vec<T> {
        let mut order = alloc::vec::Vec::with_capacity(self.len);
        let mut current = self.min;
        while !current.is_sentinel() {
            order.push(current);
            current = self.successor(current);
        }

        let values = order.into_iter().map(|handle| self.nodes.take(handle).into_value()).collect();
        self.nodes.clear();
        self.reset();
        values
    }

    pub(crate) fn value(&self, handle: Handle) -> &T {
        self.nodes.get(handle).value()
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut T {
        self.nodes.get_mut(handle).value_mut()
    }

    /// The in-order successor of `node`. The successor of the largest node is the sentinel, and the
    /// successor of the sentinel is the smallest node.
    pub(crate) fn successor(&self, node: Handle) -> Handle {
        if node.is_sentinel() {
            return self.min;
        }

        let right = self.header(node).right();
        if !right.is_sentinel() {
            return self.leftmost(right);
        }

        let mut current = node;
        let mut parent = self.header(current).parent();
        while !parent.is_sentinel() && self.header(parent).right() == current {
            current = parent;
            parent = self.header(current).parent();
        }
        parent
    }

    /// The in-order predecessor of `node`. The predecessor of the sentinel is the cached maximum,
    /// and the predecessor of the smallest node is the sentinel.
    pub(crate) fn predecessor(&self, node: Handle) -> Handle {
        if node.is_sentinel() {
            return self.sentinel.parent();
        }

        let left = self.header(node).left();
        if !left.is_sentinel() {
            return self.rightmost(left);
        }

        let mut current = node;
        let mut parent = self.header(current).parent();
        while !parent.is_sentinel() && self.header(parent).left() == current {
            current = parent;
            parent = self.header(current).parent();
        }
        parent
    }

    fn header(&self, handle: Handle) -> &Header {
        if handle.is_sentinel() {
            &self.sentinel
        } else {
            self.nodes.get(handle).header()
        }
    }

    fn header_mut(&mut self, handle: Handle) -> &mut Header {
        if handle.is_sentinel() {
            &mut self.sentinel
        } else {
            self.nodes.get_mut(handle).header_mut()
        }
    }

    fn leftmost(&self, mut node: Handle) -> Handle {
        loop {
            let left = self.header(node).left();
            if left.is_sentinel() {
                return node;
            }
            node = left;
        }
    }

    fn rightmost(&self, mut node: Handle) -> Handle {
        loop {
            let right = self.header(node).right();
            if right.is_sentinel() {
                return node;
            }
            node = right;
        }
    }

    /// Puts the tree back into its empty state. Does not touch the arena.
    fn reset(&mut self) {
        self.sentinel = Header::sentinel();
        self.root = Handle::SENTINEL;
        self.min = Handle::SENTINEL;
        self.max = Handle::SENTINEL;
        self.len = 0;
    }

    fn unlink_leaf(&mut self, leaf: Handle) -> T {
        if self.len == 1 {
            let node = self.nodes.take(leaf);
            self.nodes.clear();
            self.reset();
            return node.into_value();
        }

        let Slot::Child(parent, side) = self.slot_of(leaf) else {
            unreachable!("a leaf of a tree with several values cannot be the root");
        };
        self.header_mut(parent).set_child(side, Handle::SENTINEL);

        // An extremal leaf hands its role to its parent.
        if leaf == self.min {
            self.min = parent;
        }
        if leaf == self.max {
            self.max = parent;
            self.sentinel.set_parent(parent);
        }

        self.len -= 1;
        let node = self.nodes.take(leaf);
        self.rebalance_from(parent);
        debug_assert_eq!(self.nodes.len(), self.len);
        node.into_value()
    }

    fn slot_of(&self, node: Handle) -> Slot {
        let parent = self.header(node).parent();
        if parent.is_sentinel() {
            Slot::Root
        } else if self.header(parent).left() == node {
            Slot::Child(parent, Side::Left)
        } else {
            Slot::Child(parent, Side::Right)
        }
    }

    fn subtree(&self, slot: Slot) -> Handle {
        match slot {
            Slot::Root => self.root,
            Slot::Child(parent, side) => self.header(parent).child(side),
        }
    }

    /// Hangs `subtree` in `slot`, fixing its parent link. The sentinel is never re-parented.
    fn attach(&mut self, slot: Slot, subtree: Handle) {
        let parent = match slot {
            Slot::Root => {
                self.root = subtree;
                Handle::SENTINEL
            }
            Slot::Child(parent, side) => {
                self.header_mut(parent).set_child(side, subtree);
                parent
            }
        };
        if !subtree.is_sentinel() {
            self.header_mut(subtree).set_parent(parent);
        }
    }

    fn update_height(&mut self, node: Handle) {
        let header = self.header(node);
        let height = 1 + self.header(header.left()).height().max(self.header(header.right()).height());
        self.header_mut(node).set_height(height);
    }

    fn balance_factor(&self, node: Handle) -> i64 {
        let header = self.header(node);
        i64::from(self.header(header.left()).height()) - i64::from(self.header(header.right()).height())
    }

    /// Single rotation of the subtree held in `slot`. A `Side::Left` rotation lifts the right
    /// child, a `Side::Right` rotation lifts the left one. Returns the new subtree root.
    fn rotate(&mut self, slot: Slot, direction: Side) -> Handle {
        let top = self.subtree(slot);
        let lifted = direction.opposite();
        let pivot = self.header(top).child(lifted);
        let inner = self.header(pivot).child(direction);
        log::trace!("rotating {direction:?} at {top:?}, lifting {pivot:?}");

        self.header_mut(top).set_child(lifted, inner);
        if !inner.is_sentinel() {
            self.header_mut(inner).set_parent(top);
        }
        self.header_mut(pivot).set_child(direction, top);
        self.header_mut(top).set_parent(pivot);
        self.attach(slot, pivot);

        self.update_height(top);
        self.update_height(pivot);
        pivot
    }

    /// Recomputes the height of `node` and restores its balance. Returns the root of the subtree
    /// that now stands where `node` stood.
    fn rebalance(&mut self, node: Handle) -> Handle {
        self.update_height(node);
        let factor = self.balance_factor(node);

        if factor > 1 {
            let left = self.header(node).left();
            if self.balance_factor(left) < 0 {
                self.rotate(Slot::Child(node, Side::Left), Side::Left);
            }
            let slot = self.slot_of(node);
            self.rotate(slot, Side::Right)
        } else if factor < -1 {
            let right = self.header(node).right();
            if self.balance_factor(right) > 0 {
                self.rotate(Slot::Child(node, Side::Right), Side::Right);
            }
            let slot = self.slot_of(node);
            self.rotate(slot, Side::Left)
        } else {
            node
        }
    }

    /// Rebalances every node from `start` up to the root.
    fn rebalance_from(&mut self, start: Handle) {
        let mut current = start;
        while !current.is_sentinel() {
            let top = self.rebalance(current);
            current = self.header(top).parent();
        }
    }
}

impl<T, C: Comparator<T>> AvlTree<T, C> {
    /// Builds a tree from `values`, inserting them in order under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `values` yields more than
    /// [`max_size`](AvlTree::max_size) accepted values.
    pub fn from_values<I>(values: I, policy: Policy) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        C: Default,
    {
        Self::from_values_with(values, C::default(), policy)
    }

    /// Like [`from_values`](AvlTree::from_values), with an explicit comparator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `values` yields more than
    /// [`max_size`](AvlTree::max_size) accepted values.
    pub fn from_values_with<I>(values: I, comparator: C, policy: Policy) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(comparator);
        for value in values {
            tree.insert(value, policy)?;
        }
        Ok(tree)
    }

    /// Returns a cursor at a value whose key equals `key`, or the end cursor if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, key: &C::Key) -> Cursor<'_, T, C> {
        Cursor::new(self, self.search(key))
    }

    /// Returns `true` if a value with key `key` is present.
    pub fn contains(&self, key: &C::Key) -> bool {
        !self.search(key).is_sentinel()
    }

    /// Returns a cursor at the first value whose key is not less than `key`.
    pub fn lower_bound(&self, key: &C::Key) -> Cursor<'_, T, C> {
        let mut current = self.root;
        let mut candidate = Handle::SENTINEL;
        while !current.is_sentinel() {
            if self.compare_at(current, key) == Ordering::Less {
                current = self.header(current).right();
            } else {
                candidate = current;
                current = self.header(current).left();
            }
        }
        Cursor::new(self, candidate)
    }

    /// Returns a cursor at the first value whose key is greater than `key`.
    pub fn upper_bound(&self, key: &C::Key) -> Cursor<'_, T, C> {
        let mut current = self.root;
        let mut candidate = Handle::SENTINEL;
        while !current.is_sentinel() {
            if self.compare_at(current, key) == Ordering::Greater {
                candidate = current;
                current = self.header(current).left();
            } else {
                current = self.header(current).right();
            }
        }
        Cursor::new(self, candidate)
    }

    /// Inserts `value` under `policy`.
    ///
    /// Returns the position of the inserted value and `true`, or, when `policy` is
    /// [`Policy::Unique`] and an equal value is already present, the position of that value and
    /// `false` (and `value` is dropped). Under [`Policy::Multi`] an equal value is placed after every
    /// value it compares equal to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`], leaving the tree unmodified, if the tree already holds
    /// [`max_size`](AvlTree::max_size) values.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T, policy: Policy) -> Result<(Position, bool), Error> {
        self.ensure_capacity()?;
        let (handle, inserted) = self.insert_unchecked(value, policy);
        Ok((Position(handle), inserted))
    }

    /// Removes a value whose key equals `key` and returns it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, key: &C::Key) -> Option<T> {
        let handle = self.search(key);
        self.erase_at(Position(handle))
    }

    /// Moves every value of `other` into `self` in ascending order under `policy`, leaving `other`
    /// empty. Under [`Policy::Unique`] values of `other` equal to one already in `self` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when `self` fills up. The merge is not transactional:
    /// values already moved stay in `self`, the rest stay in `other`, and both trees remain valid.
    pub fn merge(&mut self, other: &mut Self, policy: Policy) -> Result<(), Error> {
        log::debug!("merging {} values into a tree of {} under {policy:?}", other.len, self.len);
        while !other.is_empty() {
            self.ensure_capacity()?;
            if let Some(value) = other.pop_front() {
                self.insert_unchecked(value, policy);
            }
        }
        Ok(())
    }

    /// The node holding a value with key `key`, or the sentinel.
    pub(crate) fn search(&self, key: &C::Key) -> Handle {
        let mut current = self.root;
        while !current.is_sentinel() {
            match self.compare_at(current, key) {
                Ordering::Greater => current = self.header(current).left(),
                Ordering::Less => current = self.header(current).right(),
                Ordering::Equal => return current,
            }
        }
        Handle::SENTINEL
    }

    fn ensure_capacity(&self) -> Result<(), Error> {
        let max_size = self.max_size();
        if self.len >= max_size {
            log::debug!("refusing insertion: tree already holds {max_size} values");
            return Err(Error::CapacityExceeded { max_size });
        }
        Ok(())
    }

    /// Compares the key stored at `node` against `key`.
    fn compare_at(&self, node: Handle, key: &C::Key) -> Ordering {
        self.comparator.compare(self.comparator.key(self.value(node)), key)
    }

    pub(crate) fn insert_unchecked(&mut self, value: T, policy: Policy) -> (Handle, bool) {
        if self.root.is_sentinel() {
            let handle = self.nodes.alloc(Node::new(value, Handle::SENTINEL));
            self.root = handle;
            self.min = handle;
            self.max = handle;
            self.sentinel.set_parent(handle);
            self.len = 1;
            return (handle, true);
        }

        let mut parent = self.root;
        let side = loop {
            let node = self.nodes.get(parent);
            let ordering = self.comparator.compare(self.comparator.key(&value), self.comparator.key(node.value()));
            let side = match (ordering, policy) {
                (Ordering::Less, _) => Side::Left,
                (Ordering::Greater, _) | (Ordering::Equal, Policy::Multi) => Side::Right,
                (Ordering::Equal, Policy::Unique) => return (parent, false),
            };
            let child = node.header().child(side);
            if child.is_sentinel() {
                break side;
            }
            parent = child;
        };

        let handle = self.nodes.alloc(Node::new(value, parent));
        self.header_mut(parent).set_child(side, handle);
        match side {
            Side::Left if parent == self.min => self.min = handle,
            Side::Right if parent == self.max => {
                self.max = handle;
                self.sentinel.set_parent(handle);
            }
            _ => {}
        }

        self.len += 1;
        self.rebalance_from(parent);
        debug_assert_eq!(self.nodes.len(), self.len);
        (handle, true)
    }

    /// Mutable access to the value with key `key`. Callers must not change the key.
    pub(crate) fn find_mut(&mut self, key: &C::Key) -> Option<&mut T> {
        let handle = self.search(key);
        if handle.is_sentinel() {
            return None;
        }
        Some(self.value_mut(handle))
    }
}

impl<T: Clone, C: Comparator<T> + Clone> Clone for AvlTree<T, C> {
    /// Rebuilds the tree by re-inserting every value in order, which re-derives heights and
    /// balance rather than copying them.
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.comparator.clone());
        for value in self {
            tree.insert_unchecked(value.clone(), Policy::Multi);
        }
        tree
    }
}

impl<T, C: Default> Default for AvlTree<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for AvlTree<T, C> {}

impl<T: Hash, C> Hash for AvlTree<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for value in self {
            value.hash(state);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T, C> IntoIterator for AvlTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter::new(self.drain_sorted())
    }
}
