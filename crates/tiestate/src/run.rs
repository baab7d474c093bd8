//! The tying pipeline: read inputs, build the forest, rewrite, write.

use senone_diagnostic::{Diagnostic, ErrorCode, Location};
use senone_format::{
    read_model_def, read_question_catalog, write_model_def, DirTreeLoader, FormatError,
};
use senone_tree::{ForestBuilder, ForestError, TreeError};
use tracing::{info, info_span};

use crate::{rewrite, RewriteError, TieConfig};

/// Counts reported after a successful run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Senones created from tree leaves.
    pub n_seno: u32,
    /// CI tied states plus senones.
    pub n_tied_state: u32,
    /// Context-dependent units rewritten.
    pub n_cd: usize,
}

/// Anything that stops a run. Each variant knows which input it came from.
#[derive(Debug, thiserror::Error)]
pub enum TieError {
    #[error("{0}")]
    ModelDef(FormatError),
    #[error("{0}")]
    PhoneSets(FormatError),
    #[error(transparent)]
    Forest(ForestError<FormatError>),
    #[error(transparent)]
    Rewrite(RewriteError),
    #[error("{0}")]
    Output(FormatError),
}

impl TieError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TieError::ModelDef(e) | TieError::PhoneSets(e) if e.is_io() => ErrorCode::E2001,
            TieError::ModelDef(_) => ErrorCode::E3001,
            TieError::PhoneSets(_) => ErrorCode::E3002,
            TieError::Forest(e) => match e {
                ForestError::MissingEntry { .. } | ForestError::NoEmittingState { .. } => {
                    ErrorCode::E3004
                }
                ForestError::Load { source, .. } if source.is_io() => ErrorCode::E2001,
                ForestError::Load { .. } => ErrorCode::E3003,
                ForestError::Tree {
                    source: TreeError::IdSpaceExhausted,
                    ..
                }
                | ForestError::LeafCountMismatch { .. } => ErrorCode::E9001,
                ForestError::Tree { .. } => ErrorCode::E3003,
            },
            TieError::Rewrite(e) => match e {
                RewriteError::Resolve {
                    source: TreeError::MissingTree { .. },
                    ..
                } => ErrorCode::E3004,
                RewriteError::Overflow { .. } => ErrorCode::E9001,
                RewriteError::Resolve { .. } | RewriteError::UnknownUnit { .. } => {
                    ErrorCode::E9002
                }
            },
            TieError::Output(_) => ErrorCode::E2002,
        }
    }

    /// The report shown to the user.
    pub fn diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            TieError::ModelDef(e) | TieError::PhoneSets(e) | TieError::Output(e) => {
                diagnostic = diagnostic.with_location(location(e));
            }
            TieError::Forest(ForestError::Load { name, source }) => {
                diagnostic = diagnostic
                    .with_location(location(source))
                    .with_note(source.to_string());
                if source.is_io() {
                    diagnostic = diagnostic.with_note(format!(
                        "every emitting state of phone '{}' needs a tree; state {} has none",
                        name.phone, name.state
                    ));
                }
            }
            TieError::Forest(ForestError::Tree { source, .. })
            | TieError::Rewrite(RewriteError::Resolve { source, .. }) => {
                diagnostic = diagnostic.with_note(source.to_string());
            }
            TieError::Forest(_) | TieError::Rewrite(_) => {}
        }
        diagnostic
    }
}

fn location(error: &FormatError) -> Location {
    Location {
        path: error.origin(),
        line: error.line(),
    }
}

/// Run the whole pipeline. Nothing is written unless every step succeeds.
pub fn run(config: &TieConfig) -> Result<RunSummary, TieError> {
    let _span = info_span!("tiestate").entered();

    info!("Reading: {}", config.input_mdef.display());
    let input = read_model_def(&config.input_mdef).map_err(TieError::ModelDef)?;

    info!("Reading: {}", config.pset.display());
    let catalog =
        read_question_catalog(&config.pset, &input.acmod_set).map_err(TieError::PhoneSets)?;
    info!("{} phone sets", catalog.len());

    let loader = DirTreeLoader::new(&config.tree_dir);
    let build = ForestBuilder::new(&input, &catalog)
        .build(&loader, input.n_tied_ci_state)
        .map_err(TieError::Forest)?;
    let ids = build.id_range();
    info!("senones {}..{}", ids.start, ids.end);

    let output =
        rewrite(&input, &build.forest, &catalog, build.n_seno).map_err(TieError::Rewrite)?;

    info!("Writing: {}", config.output_mdef.display());
    write_model_def(&output, &config.output_mdef).map_err(TieError::Output)?;

    Ok(RunSummary {
        n_seno: build.n_seno,
        n_tied_state: output.n_tied_state,
        n_cd: output.acmod_set.n_cd(),
    })
}
