//! Processor configuration: target platform and output paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::texture::{ReadMode, TextureKind};

/// Backend the rewritten source is meant for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Platform {
    #[default]
    Cuda,
    OpenCl,
}

impl Platform {
    pub const ALL: &'static [Platform] = &[Platform::Cuda, Platform::OpenCl];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Cuda => "cuda",
            Platform::OpenCl => "opencl",
        }
    }

    pub fn vocabulary(self) -> &'static MacroVocabulary {
        match self {
            Platform::Cuda => &CUDA,
            Platform::OpenCl => &OPENCL,
        }
    }

    /// Prologue header included when none is configured.
    pub fn default_prologue(self) -> &'static str {
        match self {
            Platform::Cuda => "kpp/prologue_cuda.h",
            Platform::OpenCl => "kpp/prologue_opencl.h",
        }
    }

    /// Whether texture kernel parameters need a file-scope global and a local
    /// binding. OpenCL passes images as plain kernel arguments.
    pub fn binds_kernel_globals(self) -> bool {
        matches!(self, Platform::Cuda)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A platform name that is not `cuda` or `opencl`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown platform `{0}` (expected `cuda` or `opencl`)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cuda" => Ok(Platform::Cuda),
            "opencl" | "cl" => Ok(Platform::OpenCl),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// Macro names and read-mode spellings a platform prologue defines.
#[derive(Debug, PartialEq, Eq)]
pub struct MacroVocabulary {
    pub texture_type: &'static str,
    pub surface_type: &'static str,
    pub kernel_texture_raw: &'static str,
    pub kernel_texture_norm: &'static str,
    pub kernel_surface: &'static str,
    pub texture_global: &'static str,
    pub surface_global: &'static str,
    pub texture_bind: &'static str,
    pub surface_bind: &'static str,
    pub read_raw: &'static str,
    pub read_norm: &'static str,
}

static CUDA: MacroVocabulary = MacroVocabulary {
    texture_type: "__kpp_cuda_texture_type",
    surface_type: "__kpp_cuda_surface_type",
    kernel_texture_raw: "__kpp_cuda_kernel_texture_raw",
    kernel_texture_norm: "__kpp_cuda_kernel_texture_norm",
    kernel_surface: "__kpp_cuda_kernel_surface",
    texture_global: "__kpp_cuda_texture_global",
    surface_global: "__kpp_cuda_surface_global",
    texture_bind: "__kpp_cuda_texture_bind",
    surface_bind: "__kpp_cuda_surface_bind",
    read_raw: "cudaReadModeElementType",
    read_norm: "cudaReadModeNormalizedFloat",
};

static OPENCL: MacroVocabulary = MacroVocabulary {
    texture_type: "__kpp_cl_texture_type",
    surface_type: "__kpp_cl_surface_type",
    kernel_texture_raw: "__kpp_cl_kernel_texture_raw",
    kernel_texture_norm: "__kpp_cl_kernel_texture_norm",
    kernel_surface: "__kpp_cl_kernel_surface",
    texture_global: "__kpp_cl_texture_global",
    surface_global: "__kpp_cl_surface_global",
    texture_bind: "__kpp_cl_texture_bind",
    surface_bind: "__kpp_cl_surface_bind",
    read_raw: "__kpp_cl_read_raw",
    read_norm: "__kpp_cl_read_norm",
};

impl MacroVocabulary {
    pub fn read_mode(&self, mode: ReadMode) -> &'static str {
        match mode {
            ReadMode::Raw => self.read_raw,
            ReadMode::Normalized => self.read_norm,
        }
    }

    /// Macro declaring a canonical texture or surface type.
    pub fn type_macro(&self, kind: TextureKind) -> &'static str {
        match kind {
            TextureKind::Texture => self.texture_type,
            TextureKind::Surface => self.surface_type,
        }
    }

    /// Macro spelling a kernel parameter of the given kind and mode.
    pub fn kernel_param_macro(&self, kind: TextureKind, mode: ReadMode) -> &'static str {
        match (kind, mode) {
            (TextureKind::Surface, _) => self.kernel_surface,
            (TextureKind::Texture, ReadMode::Raw) => self.kernel_texture_raw,
            (TextureKind::Texture, ReadMode::Normalized) => self.kernel_texture_norm,
        }
    }

    pub fn global_macro(&self, kind: TextureKind) -> &'static str {
        match kind {
            TextureKind::Texture => self.texture_global,
            TextureKind::Surface => self.surface_global,
        }
    }

    pub fn bind_macro(&self, kind: TextureKind) -> &'static str {
        match kind {
            TextureKind::Texture => self.texture_bind,
            TextureKind::Surface => self.surface_bind,
        }
    }
}

/// Everything the processor and its transforms read about one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Name used in diagnostics.
    pub file_name: String,
    pub platform: Platform,
    /// Header spelled in the prologue `#include`; platform default if `None`.
    pub prologue_header: Option<String>,
    /// Where the texture side-table is written; not written if `None`.
    pub binary_path: Option<PathBuf>,
}

impl ProcessorConfig {
    pub fn new(file_name: impl Into<String>, platform: Platform) -> Self {
        ProcessorConfig {
            file_name: file_name.into(),
            platform,
            prologue_header: None,
            binary_path: None,
        }
    }

    #[must_use]
    pub fn with_prologue(mut self, header: impl Into<String>) -> Self {
        self.prologue_header = Some(header.into());
        self
    }

    #[must_use]
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(path.into());
        self
    }

    pub fn prologue_header(&self) -> &str {
        self.prologue_header
            .as_deref()
            .unwrap_or_else(|| self.platform.default_prologue())
    }

    pub fn binary_path(&self) -> Option<&Path> {
        self.binary_path.as_deref()
    }

    pub fn vocabulary(&self) -> &'static MacroVocabulary {
        self.platform.vocabulary()
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig::new("<input>", Platform::default())
    }
}
