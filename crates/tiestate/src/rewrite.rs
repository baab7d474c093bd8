//! Rewrite a model definition so context-dependent states use tree leaves.

use rayon::prelude::*;
use senone_ir::{ModelDef, ModelDefEntry, TiedStateId};
use senone_tree::{QuestionCatalog, TreeError, TreeForest};
use tracing::{info_span, trace};

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("unit {unit} is not in the acoustic-model catalog")]
    UnknownUnit { unit: String },

    #[error("cannot resolve state {state} of {unit}")]
    Resolve {
        unit: String,
        state: usize,
        source: TreeError,
    },

    #[error("{n_tied_ci_state} CI tied states plus {n_seno} senones overflow the id space")]
    Overflow { n_tied_ci_state: u32, n_seno: u32 },
}

impl RewriteError {
    /// Whether this points at a defect rather than at the input files.
    pub fn is_internal(&self) -> bool {
        match self {
            RewriteError::Resolve { source, .. } => source.is_internal(),
            RewriteError::UnknownUnit { .. } | RewriteError::Overflow { .. } => true,
        }
    }
}

/// Build the tied model definition.
///
/// CI entries are copied unchanged. Each emitting state of a CD unit is
/// replaced by the leaf its context reaches in the tree for the unit's base
/// phone and that state; non-emitting states stay `NO_ID`. Units are
/// resolved in parallel, but output order and the reported error (the first
/// failing unit) are the same as for a sequential pass.
pub fn rewrite(
    input: &ModelDef,
    forest: &TreeForest,
    catalog: &QuestionCatalog,
    n_seno: u32,
) -> Result<ModelDef, RewriteError> {
    let acmod_set = &input.acmod_set;
    let _span = info_span!("rewrite", n_cd = acmod_set.n_cd()).entered();

    let n_tied_state = input
        .n_tied_ci_state
        .checked_add(n_seno)
        .ok_or(RewriteError::Overflow {
            n_tied_ci_state: input.n_tied_ci_state,
            n_seno,
        })?;

    let resolved: Vec<Result<ModelDefEntry, RewriteError>> = input
        .cd_entries()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|entry| tie_unit(input, entry, forest, catalog))
        .collect();

    let mut entries: Vec<ModelDefEntry> = input.ci_entries().cloned().collect();
    for entry in resolved {
        entries.push(entry?);
    }

    Ok(ModelDef {
        acmod_set: acmod_set.clone(),
        entries,
        n_tied_state,
        n_tied_ci_state: input.n_tied_ci_state,
        n_tied_tmat: input.n_tied_tmat,
    })
}

fn tie_unit(
    input: &ModelDef,
    entry: &ModelDefEntry,
    forest: &TreeForest,
    catalog: &QuestionCatalog,
) -> Result<ModelDefEntry, RewriteError> {
    let acmod_set = &input.acmod_set;
    let context = acmod_set
        .context(entry.acmod)
        .ok_or_else(|| RewriteError::UnknownUnit {
            unit: acmod_set.unit_name(entry.acmod),
        })?;

    let states = entry
        .states
        .iter()
        .enumerate()
        .map(|(state, &id)| {
            if !id.is_valid() {
                return Ok(TiedStateId::NO_ID);
            }
            let tied = forest
                .resolve(context.base, state, &context, catalog)
                .map_err(|source| RewriteError::Resolve {
                    unit: acmod_set.unit_name(entry.acmod),
                    state,
                    source,
                })?;
            trace!("{} {state} -> {tied}", acmod_set.unit_name(entry.acmod));
            Ok(tied)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ModelDefEntry {
        acmod: entry.acmod,
        tmat: entry.tmat,
        states,
    })
}
