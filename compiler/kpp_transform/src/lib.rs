//! Transform pipeline for kpp kernel sources.
//!
//! A [`Processor`] owns the token list and node tree of one file. Rewrites
//! implement [`Transform`] and are collected in a [`TransformRegistry`];
//! [`Processor::apply_transforms`] runs them in registration order and stops
//! at the first error.
//!
//! Built-in transforms:
//! - [`PrologueTransform`]: `#include` of the platform prologue header.
//! - [`TextureTransform`]: platform-agnostic texture and surface types to
//!   platform macros, with an optional binary side-table.
//!
//! ```text
//! source → lex → parse → Processor → [prologue, texture] → emit
//! ```

mod config;
mod error;
pub mod prologue;
mod processor;
mod registry;
mod run;
pub mod texture;

pub use config::{MacroVocabulary, Platform, ProcessorConfig, UnknownPlatform};
pub use error::{ProcessError, TransformError, TransformErrorKind};
pub use processor::Processor;
pub use prologue::PrologueTransform;
pub use registry::{Transform, TransformFactory, TransformRegistry};
pub use run::RunBuilder;
pub use texture::{
    ReadMode, Signature, TextureGlobalVar, TextureKind, TextureTransform, TextureType,
};

/// Load `source`, apply the built-in transforms and return the rewritten
/// text.
pub fn process(config: ProcessorConfig, source: &str) -> Result<String, ProcessError> {
    let mut processor = Processor::load(config, source)?;
    processor.apply_transforms(&TransformRegistry::with_builtin())?;
    Ok(processor.emit_to_string())
}
