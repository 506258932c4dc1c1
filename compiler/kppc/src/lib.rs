//! kpp command-line driver.
//!
//! Wires argument parsing, file I/O, logging and diagnostic rendering around
//! the `kpp_transform` pipeline.

mod cli;
mod commands;

use std::sync::Once;

pub use cli::{Cli, ColorArg};
pub use commands::{dump_tokens, dump_tree, run};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`. Does nothing if it is unset.
///
/// `KPP_LOG_TREE=1` renders spans as an indented tree instead of flat lines.
/// Logs always go to stderr so they never mix with rewritten source on
/// stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);
        if std::env::var_os("KPP_LOG_TREE").is_some_and(|v| v == "1") {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
