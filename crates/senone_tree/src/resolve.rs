//! Context resolution: walk a labeled tree to the tied state of a context.

use senone_ir::{PhoneticContext, TiedStateId};
use tracing::trace;

use crate::{DecisionTree, Node, QuestionCatalog, TreeError};

/// Find the tied state `tree` assigns to `context`.
///
/// Every failure here means the tree was not built or labeled correctly.
/// The walk is bounded by the node count, so a cyclic tree yields
/// [`TreeError::Malformed`] instead of looping.
pub fn resolve(
    tree: &DecisionTree,
    context: &PhoneticContext,
    catalog: &QuestionCatalog,
) -> Result<TiedStateId, TreeError> {
    if tree.is_empty() {
        return Err(TreeError::Empty);
    }

    let mut id = tree.root();
    for _ in 0..=tree.len() {
        let node = tree.node(id).ok_or(TreeError::Malformed {
            node: id,
            reason: "child index out of range",
        })?;
        match *node {
            Node::Leaf { tied_state } if tied_state.is_valid() => return Ok(tied_state),
            Node::Leaf { .. } => return Err(TreeError::UnlabeledLeaf { node: id }),
            Node::Internal { question, yes, no } => {
                let question = tree.question(question).ok_or(TreeError::Malformed {
                    node: id,
                    reason: "question index out of range",
                })?;
                let answer = catalog.eval_compound(question, context);
                trace!(
                    node = %id,
                    question = %catalog.describe(question),
                    answer,
                    "question"
                );
                id = if answer { yes } else { no };
            }
        }
    }

    Err(TreeError::Malformed {
        node: id,
        reason: "walk did not reach a leaf",
    })
}
