use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentinel_avl::{AvlTree, ByKey, Descending, Error, Natural, Policy};

fn in_order<T: Clone, C>(tree: &AvlTree<T, C>) -> Vec<T> {
    tree.iter().cloned().collect()
}

#[test]
fn scenario_from_seven_values() {
    let values = [5, 3, 8, 1, 4, 7, 9];
    let mut tree = AvlTree::<i32>::from_values(values, Policy::Unique).unwrap();

    assert_eq!(in_order(&tree), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.len(), 7);
    assert!(tree.height() <= 4);

    // A second insert of an existing value is refused.
    let (position, inserted) = tree.insert(5, Policy::Unique).unwrap();
    assert!(!inserted);
    assert_eq!(tree.get_at(position), Some(&5));
    assert_eq!(tree.len(), 7);

    assert_eq!(tree.erase(&5), Some(5));
    assert_eq!(in_order(&tree), [1, 3, 4, 7, 8, 9]);
    assert!(tree.height() <= 3);
    assert!(tree.find(&5).is_end());
}

#[test]
fn empty_tree_reports_empty() {
    let mut tree: AvlTree<i32> = AvlTree::new();
    assert_eq!(tree.front(), Err(Error::Empty));
    assert_eq!(tree.back(), Err(Error::Empty));
    assert_eq!(tree.pop_front(), None);
    assert_eq!(tree.erase(&3), None);
    assert_eq!(tree.height(), 0);
}

#[test]
fn descending_comparator_reverses_order() {
    let tree = AvlTree::from_values_with([3, 1, 4, 1, 5], Descending(Natural), Policy::Multi).unwrap();
    assert_eq!(in_order(&tree), [5, 4, 3, 1, 1]);
    assert_eq!(tree.front(), Ok(&5));
    assert!(tree.contains(&4));
}

#[test]
fn pairs_ordered_by_key() {
    let mut tree: AvlTree<(u8, &str), ByKey> = AvlTree::new();
    tree.insert((2, "two"), Policy::Unique).unwrap();
    tree.insert((1, "one"), Policy::Unique).unwrap();
    let (_, inserted) = tree.insert((2, "deux"), Policy::Unique).unwrap();

    assert!(!inserted);
    assert_eq!(tree.find(&2).get(), Some(&(2, "two")));
}

#[test]
fn cursor_ring_around_the_end() {
    let tree = AvlTree::<i32>::from_values([10, 20, 30], Policy::Unique).unwrap();

    let mut cursor = tree.end();
    cursor.move_prev();
    assert_eq!(cursor.get(), Some(&30));

    let mut cursor = tree.begin();
    cursor.move_prev();
    assert!(cursor.is_end());
    cursor.move_next();
    assert_eq!(cursor.get(), Some(&10));

    assert_eq!(tree.cursor_at(tree.find(&20).position()).get(), Some(&20));
}

#[test]
fn debug_lists_values_in_order() {
    let tree = AvlTree::<i32>::from_values([2, 3, 1], Policy::Unique).unwrap();
    assert_eq!(format!("{tree:?}"), "[1, 2, 3]");
}

#[test]
fn with_capacity_avoids_growth() {
    let mut tree = AvlTree::with_capacity(64, Natural);
    let capacity = tree.capacity();
    for value in 0..64 {
        tree.insert(value, Policy::Unique).unwrap();
    }
    assert_eq!(tree.capacity(), capacity);
    assert!(tree.max_size() >= 64);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn insert_find_erase_round_trip(values in proptest::collection::vec(-500i32..500, 0..400)) {
        let mut tree: AvlTree<i32> = AvlTree::new();
        let mut model = BTreeSet::new();

        for &value in &values {
            let (_, inserted) = tree.insert(value, Policy::Unique).unwrap();
            prop_assert_eq!(inserted, model.insert(value));
            prop_assert_eq!(tree.find(&value).get(), Some(&value));
        }
        prop_assert_eq!(tree.front().ok(), model.first());
        prop_assert_eq!(tree.back().ok(), model.last());

        for &value in &values {
            prop_assert_eq!(tree.erase(&value), model.take(&value));
            prop_assert!(tree.find(&value).is_end());
        }
        prop_assert!(tree.is_empty());
    }

    #[test]
    fn bounds_match_btreeset_ranges(
        values in proptest::collection::btree_set(-300i32..300, 0..200),
        needle in -320i32..320,
    ) {
        let tree = AvlTree::<i32>::from_values(values.iter().copied(), Policy::Unique).unwrap();
        prop_assert_eq!(tree.lower_bound(&needle).get(), values.range(needle..).next());
        prop_assert_eq!(tree.upper_bound(&needle).get(), values.range(needle + 1..).next());
    }

    #[test]
    fn clone_equals_source(values in proptest::collection::vec(any::<i16>(), 0..300)) {
        let tree = AvlTree::<i16>::from_values(values, Policy::Multi).unwrap();
        let copy = tree.clone();
        prop_assert_eq!(in_order(&copy), in_order(&tree));
        prop_assert_eq!(copy.len(), tree.len());
    }
}
