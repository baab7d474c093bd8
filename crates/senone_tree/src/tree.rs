//! Arena-backed binary decision trees.
//!
//! Nodes live in one `Vec` per tree and refer to their children by
//! [`NodeId`]; node `0` is the root. A tree is well formed when every node
//! except the root has exactly one parent and every node is reachable from
//! the root, which also rules out cycles.

use std::fmt;

use senone_ir::TiedStateId;

use crate::CompoundQuestion;

/// Index of a node within its tree.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a tree's question table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        QuestionId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tree node.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Node {
    /// Branch on a question: `yes` when it holds, `no` otherwise.
    Internal {
        question: QuestionId,
        yes: NodeId,
        no: NodeId,
    },
    /// A tied state; `NO_ID` until labeled.
    Leaf { tied_state: TiedStateId },
}

impl Node {
    pub const UNLABELED_LEAF: Node = Node::Leaf {
        tied_state: TiedStateId::NO_ID,
    };

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Training statistics recorded in tree files. Informational only.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct NodeStats {
    /// Weighted entropy (decrease, for internal nodes).
    pub entropy: f64,
    pub occupancy: f64,
}

/// Structural problems in a decision tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("node {node} is outside the declared {n_node} nodes")]
    NodeOutOfRange { node: u32, n_node: usize },
    #[error("node {node} is defined twice")]
    DuplicateNode { node: u32 },
    #[error("node {node} is declared but never defined")]
    MissingNode { node: u32 },
    #[error("node {node} refers to child {child}, which does not exist")]
    ChildOutOfRange { node: NodeId, child: u32 },
    #[error("node {parent} uses the root as a child")]
    RootIsChild { parent: NodeId },
    #[error("node {node} has more than one parent")]
    MultipleParents { node: NodeId },
    #[error("node {node} is not reachable from the root")]
    Unreachable { node: NodeId },
    #[error("node {node} is malformed: {reason}")]
    Malformed { node: NodeId, reason: &'static str },
    #[error("leaf {node} was reached before it was labeled")]
    UnlabeledLeaf { node: NodeId },
    #[error("no decision tree for phone {phone}, state {state}")]
    MissingTree { phone: u32, state: usize },
    #[error("tied-state id space exhausted")]
    IdSpaceExhausted,
}

impl TreeError {
    /// Whether this error means the engine itself misbehaved rather than
    /// that an input file was bad.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TreeError::UnlabeledLeaf { .. } | TreeError::IdSpaceExhausted
        )
    }
}

/// A phonetic decision tree.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    stats: Vec<NodeStats>,
    questions: Vec<CompoundQuestion>,
}

impl DecisionTree {
    /// A tree consisting of a single unlabeled leaf.
    pub fn leaf() -> Self {
        DecisionTree {
            nodes: vec![Node::UNLABELED_LEAF],
            stats: vec![NodeStats::default()],
            questions: Vec::new(),
        }
    }

    /// Assemble a tree without validating it.
    ///
    /// `stats` is padded with defaults to match `nodes`. Use [`TreeBuilder`]
    /// or call [`DecisionTree::validate`] for untrusted input.
    pub fn from_parts(
        nodes: Vec<Node>,
        mut stats: Vec<NodeStats>,
        questions: Vec<CompoundQuestion>,
    ) -> Self {
        stats.resize(nodes.len(), NodeStats::default());
        DecisionTree {
            nodes,
            stats,
            questions,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn stats(&self, id: NodeId) -> Option<&NodeStats> {
        self.stats.get(id.index())
    }

    pub fn question(&self, id: QuestionId) -> Option<&CompoundQuestion> {
        self.questions.get(id.index())
    }

    pub fn questions(&self) -> &[CompoundQuestion] {
        &self.questions
    }

    /// Set the tied state of a leaf. Returns `false` for non-leaves.
    pub(crate) fn set_leaf(&mut self, id: NodeId, tied_state: TiedStateId) -> bool {
        match self.nodes.get_mut(id.index()) {
            Some(Node::Leaf { tied_state: slot }) => {
                *slot = tied_state;
                true
            }
            _ => false,
        }
    }

    /// Leaves in labeling order: pre-order, yes branch before no branch.
    ///
    /// Fails on a dangling child index or a node reachable twice, so it also
    /// serves as a cheap structural check for trees built with
    /// [`DecisionTree::from_parts`].
    pub fn leaves(&self) -> Result<Vec<NodeId>, TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                return Err(TreeError::Malformed {
                    node: id,
                    reason: "child index out of range",
                });
            };
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(TreeError::Malformed {
                    node: id,
                    reason: "node reached twice",
                });
            }
            match *node {
                Node::Leaf { .. } => leaves.push(id),
                Node::Internal { yes, no, .. } => {
                    // `no` first so `yes` is popped first
                    stack.push(no);
                    stack.push(yes);
                }
            }
        }

        Ok(leaves)
    }

    /// Tied states of all leaves, in labeling order.
    pub fn tied_states(&self) -> Result<Vec<TiedStateId>, TreeError> {
        Ok(self
            .leaves()?
            .into_iter()
            .filter_map(|id| match self.node(id) {
                Some(Node::Leaf { tied_state }) => Some(*tied_state),
                _ => None,
            })
            .collect())
    }

    /// Full structural validation.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut has_parent = vec![false; self.nodes.len()];
        for (index, node) in (0u32..).zip(&self.nodes) {
            let parent = NodeId::new(index);
            let Node::Internal { question, yes, no } = *node else {
                continue;
            };
            if question.index() >= self.questions.len() {
                return Err(TreeError::Malformed {
                    node: parent,
                    reason: "question index out of range",
                });
            }
            for child in [yes, no] {
                if child.index() >= self.nodes.len() {
                    return Err(TreeError::ChildOutOfRange {
                        node: parent,
                        child: child.raw(),
                    });
                }
                if child == NodeId::ROOT {
                    return Err(TreeError::RootIsChild { parent });
                }
                if std::mem::replace(&mut has_parent[child.index()], true) {
                    return Err(TreeError::MultipleParents { node: child });
                }
            }
        }

        // With single parents and a parentless root the walk below cannot
        // revisit a node. Anything it misses is an orphan or on a detached cycle.
        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            reached[id.index()] = true;
            if let Node::Internal { yes, no, .. } = self.nodes[id.index()] {
                stack.push(no);
                stack.push(yes);
            }
        }
        if let Some((unreached, _)) = (0u32..).zip(&reached).find(|&(_, &r)| !r) {
            return Err(TreeError::Unreachable {
                node: NodeId::new(unreached),
            });
        }

        Ok(())
    }
}

/// Collects node definitions in any order, then validates them into a tree.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<Option<(Node, NodeStats)>>,
    questions: Vec<CompoundQuestion>,
}

impl TreeBuilder {
    /// Expect exactly `n_node` nodes, numbered `0..n_node`.
    pub fn new(n_node: usize) -> Self {
        TreeBuilder {
            nodes: vec![None; n_node],
            questions: Vec::new(),
        }
    }

    pub fn add_leaf(&mut self, id: u32, stats: NodeStats) -> Result<(), TreeError> {
        self.define(id, Node::UNLABELED_LEAF, stats)
    }

    pub fn add_internal(
        &mut self,
        id: u32,
        question: CompoundQuestion,
        yes: u32,
        no: u32,
        stats: NodeStats,
    ) -> Result<(), TreeError> {
        let question_id = QuestionId(
            u32::try_from(self.questions.len()).map_err(|_| TreeError::NodeOutOfRange {
                node: id,
                n_node: self.nodes.len(),
            })?,
        );
        self.define(
            id,
            Node::Internal {
                question: question_id,
                yes: NodeId::new(yes),
                no: NodeId::new(no),
            },
            stats,
        )?;
        self.questions.push(question);
        Ok(())
    }

    fn define(&mut self, id: u32, node: Node, stats: NodeStats) -> Result<(), TreeError> {
        let n_node = self.nodes.len();
        let slot = self
            .nodes
            .get_mut(id as usize)
            .ok_or(TreeError::NodeOutOfRange { node: id, n_node })?;
        if slot.is_some() {
            return Err(TreeError::DuplicateNode { node: id });
        }
        *slot = Some((node, stats));
        Ok(())
    }

    /// Check that every declared node was defined and the result is a tree.
    pub fn finish(self) -> Result<DecisionTree, TreeError> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut stats = Vec::with_capacity(self.nodes.len());
        for (index, slot) in (0u32..).zip(self.nodes) {
            let (node, node_stats) = slot.ok_or(TreeError::MissingNode { node: index })?;
            nodes.push(node);
            stats.push(node_stats);
        }
        let tree = DecisionTree::from_parts(nodes, stats, self.questions);
        tree.validate()?;
        Ok(tree)
    }
}
