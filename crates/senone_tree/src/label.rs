//! Leaf labeling.
//!
//! Every leaf of every tree gets a tied-state id from one running counter.
//! Leaves are visited pre-order with the yes branch first, so the same
//! forest always receives the same ids.

use std::ops::Range;

use senone_ir::TiedStateId;

use crate::{DecisionTree, TreeError};

/// Hands out consecutive tied-state ids.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TiedStateAllocator {
    next: u32,
    start: u32,
}

impl TiedStateAllocator {
    pub fn new(start: u32) -> Self {
        TiedStateAllocator { next: start, start }
    }

    /// Take the next id. `None` once the id space is exhausted.
    pub fn next_id(&mut self) -> Option<TiedStateId> {
        let id = TiedStateId::new(self.next);
        if !id.is_valid() {
            return None;
        }
        self.next += 1;
        Some(id)
    }

    /// The id the next call to [`next_id`](Self::next_id) would return.
    #[inline]
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Number of ids handed out so far.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.next - self.start
    }

    /// Reserve `n` consecutive ids at once.
    pub fn reserve(&mut self, n: u32) -> Option<Range<u32>> {
        let end = self.next.checked_add(n)?;
        if end > TiedStateId::NO_ID.raw() {
            return None;
        }
        let range = self.next..end;
        self.next = end;
        Some(range)
    }
}

/// Label every leaf of `tree` from `allocator`. Returns the number of leaves.
///
/// Leaves are collected before any id is taken, so a malformed tree consumes
/// no ids.
pub fn label_leaves(
    tree: &mut DecisionTree,
    allocator: &mut TiedStateAllocator,
) -> Result<u32, TreeError> {
    let leaves = tree.leaves()?;
    let mut labeled = 0;
    for leaf in leaves {
        let id = allocator.next_id().ok_or(TreeError::IdSpaceExhausted)?;
        // `leaves` only returns leaf nodes
        if tree.set_leaf(leaf, id) {
            labeled += 1;
        }
    }
    Ok(labeled)
}

/// Number of leaves [`label_leaves`] would label.
pub fn count_leaves(tree: &DecisionTree) -> Result<u32, TreeError> {
    let n = tree.leaves()?.len();
    u32::try_from(n).map_err(|_| TreeError::IdSpaceExhausted)
}

/// Label `tree` starting at `start`, returning the ids used.
pub fn label_leaves_from(tree: &mut DecisionTree, start: u32) -> Result<Range<u32>, TreeError> {
    let mut allocator = TiedStateAllocator::new(start);
    label_leaves(tree, &mut allocator)?;
    Ok(start..allocator.peek())
}

#[cfg(test)]
mod tests;
