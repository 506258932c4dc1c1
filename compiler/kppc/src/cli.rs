//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kpp_diagnostic::emitter::ColorMode;
use kpp_transform::{Platform, ProcessorConfig};

#[derive(Parser, Debug)]
#[command(
    name = "kppc",
    about = "Rewrite portable texture types in GPU kernels for CUDA or OpenCL",
    version
)]
pub struct Cli {
    /// Kernel source file
    pub input: PathBuf,

    /// Write rewritten source here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target platform: cuda or opencl
    #[arg(long, default_value = "cuda")]
    pub platform: Platform,

    /// Header to `#include` first (defaults to the platform prologue)
    #[arg(long, value_name = "PATH")]
    pub prologue: Option<String>,

    /// Write the kernel texture side-table to this file
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,

    /// Print the token list and exit
    #[arg(long, conflicts_with = "dump_tree")]
    pub dump_tokens: bool,

    /// Print the node tree and exit
    #[arg(long)]
    pub dump_tree: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

impl Cli {
    /// Name used in diagnostics.
    pub fn file_name(&self) -> String {
        self.input.display().to_string()
    }

    pub fn config(&self) -> ProcessorConfig {
        ProcessorConfig {
            file_name: self.file_name(),
            platform: self.platform,
            prologue_header: self.prologue.clone(),
            binary_path: self.binary.clone(),
        }
    }
}
