#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use super::*;
use crate::testing::{build, shape_strategy, Shape};
use crate::{Node, NodeId, QuestionId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// ```text
///        0
///      /   \
///     1     2
///    / \
///   3   4
/// ```
fn five_node_tree() -> DecisionTree {
    build(&Shape::Split(
        Box::new(Shape::Split(Box::new(Shape::Leaf), Box::new(Shape::Leaf))),
        Box::new(Shape::Leaf),
    ))
}

#[test]
fn test_allocator_counts() {
    let mut alloc = TiedStateAllocator::new(10);
    assert_eq!(alloc.peek(), 10);
    assert_eq!(alloc.next_id(), Some(TiedStateId::new(10)));
    assert_eq!(alloc.next_id(), Some(TiedStateId::new(11)));
    assert_eq!(alloc.allocated(), 2);
    assert_eq!(alloc.reserve(5), Some(12..17));
    assert_eq!(alloc.peek(), 17);
    assert_eq!(alloc.allocated(), 7);
}

#[test]
fn test_allocator_exhaustion() {
    let mut alloc = TiedStateAllocator::new(u32::MAX - 1);
    assert_eq!(alloc.next_id(), Some(TiedStateId::new(u32::MAX - 1)));
    assert_eq!(alloc.next_id(), None);
    assert_eq!(alloc.reserve(1), None);
    assert_eq!(alloc.allocated(), 1);
}

#[test]
fn test_single_leaf_takes_one_id() {
    let mut tree = DecisionTree::leaf();
    let mut alloc = TiedStateAllocator::new(3);
    assert_eq!(label_leaves(&mut tree, &mut alloc), Ok(1));
    assert_eq!(tree.tied_states().unwrap(), vec![TiedStateId::new(3)]);
    assert_eq!(alloc.peek(), 4);
}

#[test]
fn test_yes_branch_labeled_first() {
    let mut tree = five_node_tree();
    assert_eq!(label_leaves_from(&mut tree, 100), Ok(100..103));
    // arena is breadth-first: 1 = yes subtree, 2 = no leaf, 3/4 under 1
    let id_of = |n: u32| match tree.node(NodeId::new(n)) {
        Some(Node::Leaf { tied_state }) => tied_state.raw(),
        other => panic!("node {n} is not a leaf: {other:?}"),
    };
    assert_eq!(id_of(3), 100);
    assert_eq!(id_of(4), 101);
    assert_eq!(id_of(2), 102);
}

#[test]
fn test_malformed_tree_consumes_no_ids() {
    let mut tree = DecisionTree::from_parts(
        vec![
            Node::Internal {
                question: QuestionId::new(0),
                yes: NodeId::new(1),
                no: NodeId::new(1),
            },
            Node::UNLABELED_LEAF,
        ],
        vec![],
        vec![],
    );
    let mut alloc = TiedStateAllocator::new(0);
    assert!(matches!(
        label_leaves(&mut tree, &mut alloc),
        Err(TreeError::Malformed { .. })
    ));
    assert_eq!(alloc.allocated(), 0);
    assert!(count_leaves(&tree).is_err());
}

proptest! {
    #[test]
    fn prop_count_matches_ids_consumed(shape in shape_strategy(), start in 0u32..1_000_000) {
        let mut tree = build(&shape);
        let counted = count_leaves(&tree).unwrap();
        prop_assert_eq!(counted, shape.leaf_count());

        let mut alloc = TiedStateAllocator::new(start);
        let labeled = label_leaves(&mut tree, &mut alloc).unwrap();
        prop_assert_eq!(labeled, counted);
        prop_assert_eq!(alloc.allocated(), counted);
    }

    #[test]
    fn prop_ids_contiguous_in_visit_order(shape in shape_strategy(), start in 0u32..1_000_000) {
        let mut tree = build(&shape);
        let range = label_leaves_from(&mut tree, start).unwrap();
        let ids: Vec<u32> = tree.tied_states().unwrap().into_iter().map(|id| id.raw()).collect();
        let expected: Vec<u32> = range.collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_labeling_is_deterministic(shape in shape_strategy()) {
        let mut first = build(&shape);
        let mut second = build(&shape);
        label_leaves_from(&mut first, 7).unwrap();
        label_leaves_from(&mut second, 7).unwrap();
        prop_assert_eq!(first, second);
    }
}
