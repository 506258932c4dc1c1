//! kppc: the kpp kernel preprocessor.

use std::process::ExitCode;

use clap::Parser;
use kppc::{init_tracing, run, Cli};

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    run(&cli)
}
