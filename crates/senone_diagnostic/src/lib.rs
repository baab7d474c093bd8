//! Diagnostic system for fatal-condition reporting.
//!
//! Every failure of a tying run ends the run, so diagnostics here are about
//! saying clearly *what* failed and *where*:
//! - Error codes for searchability, grouped by category
//! - A message naming the failing file, tree or unit
//! - An optional location (file and line)
//! - Notes with additional context
//!
//! The CLI converts each library error into a [`Diagnostic`] and hands it to
//! a [`TerminalEmitter`].

mod diagnostic;
mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Location};
pub use emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
pub use error_code::{ErrorCategory, ErrorCode};
