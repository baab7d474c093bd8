//! Command-line options.
//!
//! Options take the form `-name value`, `--name value` or `-name=value`.
//! Parsing only collects what was given; [`TieOptions::validate`] then
//! checks that every required option is present, before any file is read.

use std::fmt::Write as _;
use std::path::PathBuf;

use senone_diagnostic::{Diagnostic, ErrorCode};

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(TieConfig),
    Help,
    Example,
    Version,
}

/// A validated run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieConfig {
    /// Untied model definition (`-imoddeffn`).
    pub input_mdef: PathBuf,
    /// Tied model definition to write (`-omoddeffn`).
    pub output_mdef: PathBuf,
    /// Directory of `<phone>-<state>.dtree` files (`-treedir`).
    pub tree_dir: PathBuf,
    /// Phone-set file (`-psetfn`).
    pub pset: PathBuf,
}

/// Options as given, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TieOptions {
    pub input_mdef: Option<PathBuf>,
    pub output_mdef: Option<PathBuf>,
    pub tree_dir: Option<PathBuf>,
    pub pset: Option<PathBuf>,
}

impl TieOptions {
    /// Check that all required options were given.
    pub fn validate(self) -> Result<TieConfig, ConfigError> {
        let required = |value: Option<PathBuf>, name: &'static str| {
            value.ok_or(ConfigError::Missing(name))
        };
        Ok(TieConfig {
            input_mdef: required(self.input_mdef, "imoddeffn")?,
            output_mdef: required(self.output_mdef, "omoddeffn")?,
            tree_dir: required(self.tree_dir, "treedir")?,
            pset: required(self.pset, "psetfn")?,
        })
    }

    fn slot(&mut self, name: &str) -> Option<&mut Option<PathBuf>> {
        match name {
            "imoddeffn" => Some(&mut self.input_mdef),
            "omoddeffn" => Some(&mut self.output_mdef),
            "treedir" => Some(&mut self.tree_dir),
            "psetfn" => Some(&mut self.pset),
            _ => None,
        }
    }
}

/// Option name, value placeholder, description.
const OPTIONS: [(&str, &str, &str); 4] = [
    ("imoddeffn", "<file>", "Untied model definition to read"),
    ("omoddeffn", "<file>", "Tied model definition to write"),
    ("treedir", "<dir>", "Directory holding one <phone>-<state>.dtree per tree"),
    ("psetfn", "<file>", "Phone sets used by tree questions"),
];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required option -{0}")]
    Missing(&'static str),
    #[error("unknown option '{0}'")]
    Unknown(String),
    #[error("option -{0} needs a value")]
    MissingValue(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::Missing(_) => ErrorCode::E1001,
            ConfigError::Unknown(_) => ErrorCode::E1002,
            ConfigError::MissingValue(_) => ErrorCode::E1003,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_note("run `tiestate -help` for the list of options")
    }
}

/// Parse the arguments after the program name.
///
/// `-help`, `-example` and `-version` win over everything else on the line.
/// An option given twice keeps its last value.
pub fn parse_args(args: &[String]) -> Result<Command, ConfigError> {
    let mut options = TieOptions::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(ConfigError::Unknown(arg.clone()));
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        match name {
            "help" | "h" => return Ok(Command::Help),
            "example" => return Ok(Command::Example),
            "version" => return Ok(Command::Version),
            _ => {}
        }

        let Some(slot) = options.slot(name) else {
            return Err(ConfigError::Unknown(arg.clone()));
        };
        let value = match inline {
            Some(value) => value,
            None => args
                .next()
                .map(String::as_str)
                .ok_or_else(|| ConfigError::MissingValue(name.to_string()))?,
        };
        if value.is_empty() {
            return Err(ConfigError::MissingValue(name.to_string()));
        }
        *slot = Some(PathBuf::from(value));
    }

    options.validate().map(Command::Run)
}

pub fn usage() -> String {
    let mut out = String::from(
        "Usage: tiestate -imoddeffn <file> -omoddeffn <file> -treedir <dir> -psetfn <file>\n\n",
    );
    out.push_str("Assign tied-state ids to the leaves of per-state decision trees and\n");
    out.push_str("rewrite a model definition so every triphone state uses its leaf's id.\n\n");
    out.push_str("Options:\n");
    for (name, value, description) in OPTIONS {
        let _ = writeln!(out, "  -{name} {value:<8} {description}");
    }
    out.push_str("  -help              Print this message\n");
    out.push_str("  -example           Print an example invocation\n");
    out.push_str("  -version           Print the version\n\n");
    out.push_str("Set RUST_LOG (e.g. RUST_LOG=debug) to change how much is logged.\n");
    out
}

pub fn example() -> String {
    String::from(
        "tiestate \\\n    -imoddeffn model_architecture/untied.mdef \\\n    \
         -omoddeffn model_architecture/tied.mdef \\\n    \
         -treedir trees \\\n    \
         -psetfn model_architecture/questions.pset\n",
    )
}
