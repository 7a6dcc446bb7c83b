use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentinel_avl::AvlMultiSet;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 3_000;

/// Values in a very narrow range, so most of them repeat.
fn value_strategy() -> impl Strategy<Value = i32> {
    -50i32..50i32
}

#[derive(Debug, Clone)]
enum MultiSetOp {
    Insert(i32),
    Remove(i32),
    Count(i32),
    Bounds(i32),
}

fn op_strategy() -> impl Strategy<Value = MultiSetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(MultiSetOp::Insert),
        3 => value_strategy().prop_map(MultiSetOp::Remove),
        2 => value_strategy().prop_map(MultiSetOp::Count),
        2 => value_strategy().prop_map(MultiSetOp::Bounds),
    ]
}

/// Reference model: a sorted `Vec` that keeps duplicates.
fn model_insert(model: &mut Vec<i32>, value: i32) {
    let at = model.partition_point(|&v| v <= value);
    model.insert(at, value);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn multiset_ops_match_sorted_vec(ops in proptest::collection::vec(op_strategy(), TEST_SIZE)) {
        let mut multiset: AvlMultiSet<i32> = AvlMultiSet::new();
        let mut model: Vec<i32> = Vec::new();

        for op in &ops {
            match *op {
                MultiSetOp::Insert(v) => {
                    let position = multiset.insert(v).unwrap();
                    prop_assert_eq!(multiset.get_at(position), Some(&v));
                    model_insert(&mut model, v);
                }
                MultiSetOp::Remove(v) => {
                    let expected = model.binary_search(&v).ok().map(|at| model.remove(at));
                    prop_assert_eq!(multiset.remove(&v), expected, "remove({})", v);
                }
                MultiSetOp::Count(v) => {
                    let expected = model.iter().filter(|&&x| x == v).count();
                    prop_assert_eq!(multiset.count(&v), expected, "count({})", v);
                }
                MultiSetOp::Bounds(v) => {
                    let lower = model.partition_point(|&x| x < v);
                    let upper = model.partition_point(|&x| x <= v);
                    prop_assert_eq!(multiset.lower_bound(&v).get(), model.get(lower), "lower_bound({})", v);
                    prop_assert_eq!(multiset.upper_bound(&v).get(), model.get(upper), "upper_bound({})", v);
                }
            }
            prop_assert_eq!(multiset.len(), model.len());
            prop_assert_eq!(multiset.first(), model.first());
            prop_assert_eq!(multiset.last(), model.last());
        }

        prop_assert!(multiset.iter().eq(model.iter()));
    }

    #[test]
    fn merge_concatenates_sorted(
        a in proptest::collection::vec(value_strategy(), 0..200),
        b in proptest::collection::vec(value_strategy(), 0..200),
    ) {
        let mut left: AvlMultiSet<i32> = a.iter().copied().collect();
        let mut right: AvlMultiSet<i32> = b.iter().copied().collect();
        left.merge(&mut right).unwrap();

        let mut expected: Vec<i32> = a.into_iter().chain(b).collect();
        expected.sort_unstable();
        prop_assert_eq!(left.into_iter().collect::<Vec<_>>(), expected);
        prop_assert!(right.is_empty());
    }
}

#[test]
fn equal_values_keep_insertion_order() {
    #[derive(Debug, Clone, Copy)]
    struct Tagged(u8, char);

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    let multiset = AvlMultiSet::from([Tagged(2, 'a'), Tagged(1, 'b'), Tagged(2, 'c'), Tagged(2, 'd')]);
    let tags: String = multiset.iter().map(|t| t.1).collect();
    assert_eq!(tags, "bacd");
    assert_eq!(multiset.last().map(|t| t.1), Some('d'));
}

#[test]
fn equal_range_walks_every_copy() {
    let multiset = AvlMultiSet::from([1, 4, 4, 4, 9]);
    let (mut from, to) = multiset.equal_range(&4);
    let mut seen = Vec::new();
    while from != to {
        seen.extend(from.get().copied());
        from.move_next();
    }
    assert_eq!(seen, [4, 4, 4]);
}
