//! Three-way comparators over a key projected out of each stored value.

use core::cmp::Ordering;

/// Orders the values stored in an [`AvlTree`](crate::AvlTree).
///
/// A comparator first projects a key out of a value, then compares two keys three ways. A single
/// `compare` call is enough for the tree to decide between "go left", "go right" and "found".
///
/// It is a logic error for `compare` not to be a total order, or for a stored value's key to change
/// while the value is in the tree.
pub trait Comparator<T: ?Sized> {
    /// The part of the value the order is defined on.
    type Key: ?Sized;

    /// Projects the key out of `value`.
    fn key<'a>(&self, value: &'a T) -> &'a Self::Key;

    /// Compares two keys.
    fn compare(&self, lhs: &Self::Key, rhs: &Self::Key) -> Ordering;
}

/// Orders values by their own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: ?Sized + Ord> Comparator<T> for Natural {
    type Key = T;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }

    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders `(key, value)` pairs by the key alone. This is what [`AvlMap`](crate::AvlMap) uses.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ByKey;

impl<K: Ord, V> Comparator<(K, V)> for ByKey {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }

    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Reverses another comparator.
///
/// # Examples
///
/// ```
/// use sentinel_avl::{AvlTree, Descending, Natural, Policy};
///
/// let tree = AvlTree::from_values_with([1, 3, 2], Descending(Natural), Policy::Unique).unwrap();
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Descending<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Descending<C> {
    type Key = C::Key;

    #[inline]
    fn key<'a>(&self, value: &'a T) -> &'a C::Key {
        self.0.key(value)
    }

    #[inline]
    fn compare(&self, lhs: &C::Key, rhs: &C::Key) -> Ordering {
        self.0.compare(rhs, lhs)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn by_key_ignores_the_mapped_value() {
        type Pair = (i32, &'static str);
        let a: Pair = (1, "z");
        let b: Pair = (1, "a");
        let compare = <ByKey as Comparator<Pair>>::compare;
        assert_eq!(compare(&ByKey, ByKey.key(&a), ByKey.key(&b)), Ordering::Equal);
        assert_eq!(compare(&ByKey, &0, ByKey.key(&a)), Ordering::Less);
    }

    #[test]
    fn descending_flips_the_order() {
        assert_eq!(<Natural as Comparator<i32>>::compare(&Natural, &1, &2), Ordering::Less);
        let descending = Descending(Natural);
        assert_eq!(<Descending<Natural> as Comparator<i32>>::compare(&descending, &1, &2), Ordering::Greater);
        assert_eq!(<Descending<Natural> as Comparator<i32>>::compare(&descending, &2, &2), Ordering::Equal);
    }
}
