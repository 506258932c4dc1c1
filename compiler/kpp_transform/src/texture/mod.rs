//! Texture and surface type rewriting.
//!
//! Source code spells textures platform-agnostically, for example
//! `Texture2Dn<float>` (2 dimensions, normalized-float reads) or `Surface3D`.
//! The pass runs in three phases:
//!
//! 1. **Discovery** scans statements, typedefs and parameter lists for
//!    these keywords and groups the occurrences by signature.
//! 2. **Synthesis** declares one typedef per signature ahead of the
//!    earliest occurrence's file-scope container.
//! 3. **Rewrite** replaces each occurrence: declarations take the typedef
//!    name; kernel parameters take a platform macro. On CUDA, kernel
//!    definitions also get a file-scope texture variable and a local binding.
//!
//! When a side-table path is configured, kernel texture parameters are also
//! written to a small binary file for host tooling.

mod discover;
mod rewrite;
pub mod side_table;

use std::path::PathBuf;

use kpp_ir::{NodeId, TokenId};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    MacroVocabulary, Platform, Processor, ProcessorConfig, Transform, TransformError,
    TransformRegistry,
};

pub use side_table::{BoundParam, KernelTextures, SideTableError};

pub const NAME: &str = "texture";

pub fn register(registry: &mut TransformRegistry) {
    registry.register(NAME, create);
}

fn create(config: &ProcessorConfig) -> Box<dyn Transform> {
    Box::new(TextureTransform::new(config))
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TextureKind {
    Texture,
    Surface,
}

impl TextureKind {
    /// Prefix of synthesized names: `__TextureTypeName_0__`, `__SurfaceVar_k_s__`.
    pub fn stem(self) -> &'static str {
        match self {
            TextureKind::Texture => "Texture",
            TextureKind::Surface => "Surface",
        }
    }

    /// Side-table discriminant.
    pub fn tag(self) -> u8 {
        match self {
            TextureKind::Texture => 0,
            TextureKind::Surface => 1,
        }
    }
}

/// Whether reads return raw elements (`u`) or normalized floats (`n`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReadMode {
    Raw,
    Normalized,
}

impl ReadMode {
    pub fn tag(self) -> u8 {
        match self {
            ReadMode::Raw => b'u',
            ReadMode::Normalized => b'n',
        }
    }
}

/// What a texture keyword encodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Signature {
    pub kind: TextureKind,
    pub dims: u8,
    pub mode: ReadMode,
}

impl Signature {
    /// Decode `Texture{1,2,3}D{n,u}` or `Surface{1,2,3}D`. The dimension
    /// digit is character 7 and the read mode character 9.
    pub fn from_keyword(text: &str) -> Option<Signature> {
        if let Some(rest) = text.strip_prefix("Texture") {
            let [dim @ b'1'..=b'3', b'D', mode] = rest.as_bytes() else {
                return None;
            };
            let mode = match mode {
                b'u' => ReadMode::Raw,
                b'n' => ReadMode::Normalized,
                _ => return None,
            };
            return Some(Signature {
                kind: TextureKind::Texture,
                dims: dim - b'0',
                mode,
            });
        }
        let rest = text.strip_prefix("Surface")?;
        let [dim @ b'1'..=b'3', b'D'] = rest.as_bytes() else {
            return None;
        };
        Some(Signature {
            kind: TextureKind::Surface,
            dims: dim - b'0',
            mode: ReadMode::Raw,
        })
    }
}

/// Syntactic context of one occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefContext {
    /// Statement or typedef.
    Declaration,
    /// Parameter of a function that is not a kernel.
    Param,
    KernelParam {
        function: NodeId,
        function_name: String,
        /// `false` for a prototype.
        definition: bool,
    },
}

/// Name of a parameter occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamName {
    pub token: TokenId,
    pub text: String,
    /// Last significant token before the next `,` or `)`.
    pub last: TokenId,
}

/// One occurrence of a texture or surface type.
#[derive(Clone, Debug)]
pub struct TextureRef {
    pub kind: TextureKind,
    /// Statement, typedef or parameter list the keyword was found in.
    pub node: NodeId,
    pub line: u32,
    pub keyword: TokenId,
    /// Zero tokens for surfaces, up to two for `unsigned int`-style pairs.
    pub texel: SmallVec<[TokenId; 2]>,
    /// `>` for textures, the keyword itself for surfaces.
    pub end: TokenId,
    pub context: RefContext,
    pub param: Option<ParamName>,
}

/// A file-scope variable synthesized for one kernel parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureGlobalVar {
    pub function: String,
    pub param: String,
    pub name: String,
}

/// A deduplicated signature and every place it is used.
#[derive(Clone, Debug)]
pub struct TextureType {
    pub signature: Signature,
    /// Texel type as written, words separated by one space; empty for
    /// surfaces.
    pub texel: String,
    /// Synthesized typedef name.
    pub name: String,
    /// The `UserTokens` node holding the typedef.
    pub declaration: NodeId,
    pub refs: Vec<TextureRef>,
    pub globals: Vec<TextureGlobalVar>,
}

impl TextureType {
    pub fn global_var(&self, function: &str, param: &str) -> Option<&TextureGlobalVar> {
        self.globals
            .iter()
            .find(|g| g.function == function && g.param == param)
    }
}

pub struct TextureTransform {
    platform: Platform,
    vocabulary: &'static MacroVocabulary,
    binary_path: Option<PathBuf>,
    types: Vec<TextureType>,
    kernels: Vec<KernelTextures>,
}

impl TextureTransform {
    pub fn new(config: &ProcessorConfig) -> Self {
        TextureTransform {
            platform: config.platform,
            vocabulary: config.vocabulary(),
            binary_path: config.binary_path.clone(),
            types: Vec::new(),
            kernels: Vec::new(),
        }
    }

    /// Types synthesized by the last `apply`, in discovery order.
    pub fn types(&self) -> &[TextureType] {
        &self.types
    }

    /// Kernel definitions with texture parameters, in source order.
    pub fn kernels(&self) -> &[KernelTextures] {
        &self.kernels
    }

    /// Global synthesized for `param` of kernel `function`, across all types.
    pub fn global_var(&self, function: &str, param: &str) -> Option<&TextureGlobalVar> {
        self.types.iter().find_map(|t| t.global_var(function, param))
    }
}

impl Transform for TextureTransform {
    fn name(&self) -> &'static str {
        NAME
    }

    #[tracing::instrument(level = "debug", skip_all, fields(platform = %self.platform))]
    fn apply(&mut self, processor: &mut Processor) -> Result<(), TransformError> {
        self.types.clear();
        self.kernels.clear();

        let groups = discover::discover(processor)?;
        debug!(types = groups.len(), "discovered texture types");

        let mut counters = rewrite::NameCounters::default();
        for refs in groups {
            let ty = rewrite::declare_type(processor, self.vocabulary, &mut counters, refs)?;
            debug!(name = %ty.name, uses = ty.refs.len(), "declared texture type");
            self.types.push(ty);
        }

        rewrite::rewrite_refs(
            processor,
            self.vocabulary,
            self.platform.binds_kernel_globals(),
            &mut self.types,
            &mut self.kernels,
        )?;

        if let Some(path) = &self.binary_path {
            side_table::write(path, &self.kernels)?;
            debug!(
                path = %path.display(),
                kernels = self.kernels.len(),
                "wrote texture side-table"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]
mod tests;
