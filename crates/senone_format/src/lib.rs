//! Text file formats used by the state-tying tool.
//!
//! - [`mdef`]: model definition (format version 0.3), read and write
//! - [`pset`]: phone sets that tree questions refer to
//! - [`dtree`]: decision trees, plus [`DirTreeLoader`] for a tree directory
//!
//! All readers report problems as [`FormatError`], naming the file and,
//! where there is one, the line.

use std::fs;
use std::path::Path;

pub mod dtree;
mod error;
pub mod mdef;
pub mod pset;

pub use dtree::{parse_tree, DirTreeLoader, TREE_FILE_EXTENSION};
pub use error::FormatError;
pub use mdef::{format_model_def, parse_model_def, read_model_def, write_model_def};
pub use pset::{parse_question_catalog, read_question_catalog};

/// Read a whole file as UTF-8 text.
pub(crate) fn read_text(path: &Path) -> Result<String, FormatError> {
    fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-blank lines that are not `#` comments, with 1-based line numbers.
pub(crate) fn significant_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
