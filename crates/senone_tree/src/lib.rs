//! Decision-tree state tying.
//!
//! One binary decision tree per (base phone, emitting state). Internal nodes
//! ask a phonetic question about a [`PhoneticContext`]; leaves are tied
//! states (senones).
//!
//! # Pipeline
//!
//! ```text
//! TreeLoader ──► DecisionTree (unlabeled)
//!                    │
//!                    ▼  label_leaves (pre-order, yes before no)
//!               TreeForest  ◄── ForestBuilder: one tree per (phone, state)
//!                    │
//!                    ▼  resolve(context)
//!               TiedStateId
//! ```
//!
//! Trees are arenas: nodes live in a `Vec` and refer to their children by
//! [`NodeId`]. The id counter used for labeling is an explicit
//! [`TiedStateAllocator`] value so that labeling order, and therefore the
//! ids written to the output model, are reproducible.
//!
//! [`PhoneticContext`]: senone_ir::PhoneticContext

mod forest;
mod label;
mod question;
mod resolve;
mod tree;

#[cfg(test)]
mod testing;

pub use forest::{ForestBuild, ForestBuilder, ForestError, TreeForest, TreeLoader, TreeSourceName};
pub use label::{count_leaves, label_leaves, label_leaves_from, TiedStateAllocator};
pub use question::{
    CompoundQuestion, Conjunction, ContextRole, PhoneSet, PhoneSetId, PhoneSetKind,
    QuestionCatalog, QuestionError, SimpleQuestion,
};
pub use resolve::resolve;
pub use tree::{DecisionTree, Node, NodeId, NodeStats, QuestionId, TreeBuilder, TreeError};
