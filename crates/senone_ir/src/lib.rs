//! Core data types for decision-tree state tying.
//!
//! Everything here is plain data shared by the tree engine, the file-format
//! readers and the CLI:
//!
//! - [`PhoneId`], [`AcmodId`], [`TiedStateId`]: compact `u32` identifiers
//! - [`WordPosition`] and [`PhoneticContext`]: the context a question inspects
//! - [`AcmodSet`]: the acoustic-model catalog (CI phones and CD units)
//! - [`ModelDef`]: per-unit state lists plus the tied-state counts
//!
//! # Id spaces
//!
//! ```text
//! AcmodId:     [0, n_ci)            CI phones (same index as PhoneId)
//!              [n_ci, n_acmod)      CD units, in definition order
//!
//! TiedStateId: [0, n_tied_ci_state)                 CI tied states
//!              [n_tied_ci_state, + n_seno)          senones from tree leaves
//!              u32::MAX                             NO_ID (non-emitting)
//! ```

mod acmod;
mod context;
mod id;
mod model_def;
mod position;

pub use acmod::{AcmodError, AcmodSet, CdUnit, CiPhone};
pub use context::PhoneticContext;
pub use id::{AcmodId, PhoneId, TiedStateId};
pub use model_def::{ModelDef, ModelDefEntry};
pub use position::WordPosition;
