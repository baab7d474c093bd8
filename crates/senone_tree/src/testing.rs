//! Tree generators shared by the unit tests.

use std::collections::VecDeque;

use proptest::prelude::*;

use crate::{
    CompoundQuestion, ContextRole, DecisionTree, Node, NodeId, PhoneSetId, QuestionId,
    SimpleQuestion,
};

/// Tree shape used to generate arenas.
#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Leaf,
    Split(Box<Shape>, Box<Shape>),
}

impl Shape {
    pub(crate) fn leaf_count(&self) -> u32 {
        match self {
            Shape::Leaf => 1,
            Shape::Split(yes, no) => yes.leaf_count() + no.leaf_count(),
        }
    }
}

pub(crate) fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape::Leaf).prop_recursive(8, 128, 2, |inner| {
        (inner.clone(), inner).prop_map(|(yes, no)| Shape::Split(Box::new(yes), Box::new(no)))
    })
}

/// Lay out `shape` breadth-first, every internal node asking set 0 of the base.
pub(crate) fn build(shape: &Shape) -> DecisionTree {
    let question =
        CompoundQuestion::simple(SimpleQuestion::new(PhoneSetId::new(0), ContextRole::Base));
    build_with(shape, vec![question])
}

/// Lay out `shape` breadth-first, so arena order differs from labeling order.
///
/// The `k`-th internal node created asks `questions[k % questions.len()]`.
/// `questions` must not be empty unless `shape` is a single leaf.
pub(crate) fn build_with(shape: &Shape, questions: Vec<CompoundQuestion>) -> DecisionTree {
    let n_question = questions.len().max(1);
    let mut nodes = vec![Node::UNLABELED_LEAF];
    let mut queue = VecDeque::from([(0usize, shape)]);
    let mut n_internal = 0;
    while let Some((slot, shape)) = queue.pop_front() {
        if let Shape::Split(yes, no) = shape {
            let yes_id = nodes.len();
            nodes.push(Node::UNLABELED_LEAF);
            nodes.push(Node::UNLABELED_LEAF);
            nodes[slot] = Node::Internal {
                question: QuestionId::new((n_internal % n_question) as u32),
                yes: NodeId::new(yes_id as u32),
                no: NodeId::new(yes_id as u32 + 1),
            };
            n_internal += 1;
            queue.push_back((yes_id, yes));
            queue.push_back((yes_id + 1, no));
        }
    }
    DecisionTree::from_parts(nodes, vec![], questions)
}
