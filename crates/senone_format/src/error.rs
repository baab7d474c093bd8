use std::io;
use std::path::{Path, PathBuf};

use senone_tree::TreeError;

/// Errors reading or writing model files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("cannot read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// A line that does not parse or breaks a format rule.
    #[error("{message}")]
    Malformed {
        origin: String,
        line: usize,
        message: String,
    },

    /// A tree that parsed but is not a well-formed tree.
    #[error("{source}")]
    Tree { origin: String, source: TreeError },
}

impl FormatError {
    pub(crate) fn malformed(origin: &str, line: usize, message: impl Into<String>) -> Self {
        FormatError::Malformed {
            origin: origin.to_string(),
            line,
            message: message.into(),
        }
    }

    /// File the error was found in.
    pub fn origin(&self) -> String {
        match self {
            FormatError::Read { path, .. } | FormatError::Write { path, .. } => {
                path.display().to_string()
            }
            FormatError::Malformed { origin, .. } | FormatError::Tree { origin, .. } => {
                origin.clone()
            }
        }
    }

    /// Line the error was found on, when it can be pinned to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, FormatError::Read { .. } | FormatError::Write { .. })
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        FormatError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
