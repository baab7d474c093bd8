//! Decision-tree state tying.
//!
//! Reads an untied model definition, labels the leaves of one decision tree
//! per (phone, emitting state) with fresh tied-state ids, and writes a model
//! definition in which every context-dependent state uses the id of the leaf
//! its context reaches.

use std::sync::Once;

mod config;
mod rewrite;
mod run;

pub use config::{example, parse_args, usage, Command, ConfigError, TieConfig, TieOptions};
pub use rewrite::{rewrite, RewriteError};
pub use run::{run, RunSummary, TieError};

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber.
///
/// `RUST_LOG` selects what is shown; without it, `info` and above.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use std::io::IsTerminal;
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let layer = HierarchicalLayer::new(2)
            .with_targets(true)
            .with_ansi(std::io::stderr().is_terminal());
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
