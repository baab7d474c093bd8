//! The tree forest: one decision tree per (non-filler phone, emitting state).

use std::fmt;
use std::ops::Range;

use rayon::prelude::*;
use senone_ir::{ModelDef, PhoneId, PhoneticContext, TiedStateId};
use tracing::{debug, info, info_span};

use crate::label::{count_leaves, label_leaves, TiedStateAllocator};
use crate::{resolve, DecisionTree, QuestionCatalog, TreeError};

/// Name of a tree source: `<phone>-<state>`, e.g. `AA-0`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TreeSourceName {
    pub phone: String,
    pub state: usize,
}

impl TreeSourceName {
    pub fn new(phone: impl Into<String>, state: usize) -> Self {
        TreeSourceName {
            phone: phone.into(),
            state,
        }
    }
}

impl fmt::Display for TreeSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.phone, self.state)
    }
}

/// Source of unlabeled decision trees.
///
/// Called from several threads at once during a forest build.
pub trait TreeLoader: Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(
        &self,
        name: &TreeSourceName,
        catalog: &QuestionCatalog,
    ) -> Result<DecisionTree, Self::Error>;
}

/// Trees indexed by phone, then state.
///
/// Filler phones have no slots. A non-filler phone with `n` states has `n`
/// slots, the last of which (the non-emitting state) stays empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeForest {
    trees: Vec<Vec<Option<DecisionTree>>>,
}

impl TreeForest {
    /// A forest with no slots for `n_phone` phones.
    pub fn with_phones(n_phone: usize) -> Self {
        TreeForest {
            trees: vec![Vec::new(); n_phone],
        }
    }

    /// Give `phone` `n_state` empty slots, growing the phone table if needed.
    pub fn init_phone(&mut self, phone: PhoneId, n_state: usize) {
        if self.trees.len() <= phone.index() {
            self.trees.resize(phone.index() + 1, Vec::new());
        }
        self.trees[phone.index()] = vec![None; n_state];
    }

    /// Put a tree into an existing slot. Returns `false` if there is no such slot.
    pub fn insert(&mut self, phone: PhoneId, state: usize, tree: DecisionTree) -> bool {
        match self
            .trees
            .get_mut(phone.index())
            .and_then(|states| states.get_mut(state))
        {
            Some(slot) => {
                *slot = Some(tree);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, phone: PhoneId, state: usize) -> Option<&DecisionTree> {
        self.trees
            .get(phone.index())
            .and_then(|states| states.get(state))
            .and_then(Option::as_ref)
    }

    /// All slots of a phone; empty for fillers and unknown phones.
    pub fn states(&self, phone: PhoneId) -> &[Option<DecisionTree>] {
        self.trees.get(phone.index()).map_or(&[][..], Vec::as_slice)
    }

    /// Number of trees present.
    pub fn n_tree(&self) -> usize {
        self.trees.iter().flatten().flatten().count()
    }

    /// Iterate present trees in `(phone, state)` order.
    pub fn iter(&self) -> impl Iterator<Item = (PhoneId, usize, &DecisionTree)> {
        (0u32..).zip(&self.trees).flat_map(|(phone, states)| {
            let phone = PhoneId::new(phone);
            states
                .iter()
                .enumerate()
                .filter_map(move |(state, tree)| tree.as_ref().map(|t| (phone, state, t)))
        })
    }

    /// Tied state for `state` of a unit with base `phone` in `context`.
    pub fn resolve(
        &self,
        phone: PhoneId,
        state: usize,
        context: &PhoneticContext,
        catalog: &QuestionCatalog,
    ) -> Result<TiedStateId, TreeError> {
        let tree = self.get(phone, state).ok_or(TreeError::MissingTree {
            phone: phone.raw(),
            state,
        })?;
        resolve(tree, context, catalog)
    }
}

/// Errors from [`ForestBuilder::build`]; `E` is the loader's error type.
#[derive(Debug, thiserror::Error)]
pub enum ForestError<E: std::error::Error + 'static> {
    #[error("phone '{phone}' has no model definition entry")]
    MissingEntry { phone: String },
    #[error("phone '{phone}' has no emitting state")]
    NoEmittingState { phone: String },
    #[error("cannot load tree {name}")]
    Load { name: TreeSourceName, source: E },
    #[error("tree {name} cannot be labeled")]
    Tree {
        name: TreeSourceName,
        source: TreeError,
    },
    #[error("labeled {labeled} leaves but the trees contain {counted}")]
    LeafCountMismatch { labeled: u32, counted: u32 },
}

impl<E: std::error::Error + 'static> ForestError<E> {
    /// Whether the build itself misbehaved, as opposed to bad input.
    pub fn is_internal(&self) -> bool {
        match self {
            ForestError::LeafCountMismatch { .. } => true,
            ForestError::Tree { source, .. } => source.is_internal(),
            _ => false,
        }
    }
}

/// A labeled forest and the ids it used.
#[derive(Clone, Debug)]
pub struct ForestBuild {
    pub forest: TreeForest,
    /// Number of leaves labeled across the forest.
    pub n_seno: u32,
    /// Id given to the first leaf.
    pub first_id: u32,
}

impl ForestBuild {
    /// Ids assigned by the build.
    pub fn id_range(&self) -> Range<u32> {
        self.first_id..self.first_id + self.n_seno
    }
}

/// One tree to load: which slot it fills and where it comes from.
struct TreeSlot {
    phone: PhoneId,
    state: usize,
    name: TreeSourceName,
}

/// Loads and labels the tree of every emitting state of every non-filler phone.
pub struct ForestBuilder<'a> {
    model_def: &'a ModelDef,
    catalog: &'a QuestionCatalog,
}

impl<'a> ForestBuilder<'a> {
    pub fn new(model_def: &'a ModelDef, catalog: &'a QuestionCatalog) -> Self {
        ForestBuilder { model_def, catalog }
    }

    /// Build the forest, labeling leaves from `start_id` upwards.
    ///
    /// Trees load in parallel. Labeling runs in `(phone, state)` order so
    /// the ids match a sequential build, and the first failing tree in that
    /// order is the one reported.
    pub fn build<L: TreeLoader>(
        &self,
        loader: &L,
        start_id: u32,
    ) -> Result<ForestBuild, ForestError<L::Error>> {
        let _span = info_span!("forest_build", start_id).entered();

        let acmod_set = &self.model_def.acmod_set;
        let mut forest = TreeForest::with_phones(acmod_set.n_ci());
        let mut slots = Vec::new();
        for (phone, ci) in acmod_set.phones().filter(|(_, ci)| !ci.is_filler()) {
            let n_state = self
                .model_def
                .n_state(phone)
                .ok_or_else(|| ForestError::MissingEntry {
                    phone: ci.name.clone(),
                })?;
            if n_state < 2 {
                return Err(ForestError::NoEmittingState {
                    phone: ci.name.clone(),
                });
            }
            forest.init_phone(phone, n_state);
            slots.extend((0..n_state - 1).map(|state| TreeSlot {
                phone,
                state,
                name: TreeSourceName::new(ci.name.as_str(), state),
            }));
        }

        let loaded: Vec<Result<DecisionTree, L::Error>> = slots
            .par_iter()
            .map(|slot| {
                let result = loader.load(&slot.name, self.catalog);
                if let Ok(tree) = &result {
                    debug!(tree = %slot.name, n_node = tree.len(), "loaded");
                }
                result
            })
            .collect();

        let mut allocator = TiedStateAllocator::new(start_id);
        let mut counted: u32 = 0;
        for (slot, result) in slots.into_iter().zip(loaded) {
            let mut tree = result.map_err(|source| ForestError::Load {
                name: slot.name.clone(),
                source,
            })?;
            info!("{}: offset {}", slot.name, allocator.peek());
            let tree_error = |source: TreeError| -> ForestError<L::Error> {
                ForestError::Tree {
                    name: slot.name.clone(),
                    source,
                }
            };
            label_leaves(&mut tree, &mut allocator).map_err(tree_error)?;
            let leaves = count_leaves(&tree).map_err(tree_error)?;
            counted = counted
                .checked_add(leaves)
                .ok_or_else(|| tree_error(TreeError::IdSpaceExhausted))?;
            forest.insert(slot.phone, slot.state, tree);
        }

        let labeled = allocator.allocated();
        if labeled != counted {
            return Err(ForestError::LeafCountMismatch { labeled, counted });
        }
        info!(n_seno = labeled, n_tree = forest.n_tree(), "forest labeled");

        Ok(ForestBuild {
            forest,
            n_seno: labeled,
            first_id: start_id,
        })
    }
}
