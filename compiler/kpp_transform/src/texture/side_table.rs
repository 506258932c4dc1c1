//! Binary side-table of kernel texture parameters.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! "KPPTEX01"                      8-byte tag
//! u32 kernel count
//! per kernel:
//!     u32 name length, name bytes
//!     u32 parameter count
//!     per parameter, in source order:
//!         u32 binding length, binding bytes
//!         u8 kind (0 texture, 1 surface)
//!         u8 dimensions
//!         u8 read mode (b'u' or b'n')
//! ```
//!
//! The binding is the synthesized global variable when there is one,
//! otherwise the parameter name.

use std::path::Path;

use super::{ReadMode, TextureKind};
use crate::{TransformError, TransformErrorKind};

pub const TAG: &[u8; 8] = b"KPPTEX01";

/// Texture parameters of one kernel definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelTextures {
    pub name: String,
    pub params: Vec<BoundParam>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundParam {
    pub binding: String,
    pub kind: TextureKind,
    pub dims: u8,
    pub mode: ReadMode,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SideTableError {
    #[error("missing `KPPTEX01` tag")]
    BadTag,
    #[error("side-table ends early")]
    Truncated,
    #[error("unknown texture kind {0}")]
    BadKind(u8),
    #[error("unknown read mode {0:#04x}")]
    BadMode(u8),
    #[error("name is not UTF-8")]
    BadName,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "names and parameter lists are far below 4 GiB"
)]
fn put_u32(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u32).to_le_bytes());
}

fn put_str(out: &mut Vec<u8>, text: &str) {
    put_u32(out, text.len());
    out.extend_from_slice(text.as_bytes());
}

pub fn encode(kernels: &[KernelTextures]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(TAG);
    put_u32(&mut out, kernels.len());
    for kernel in kernels {
        put_str(&mut out, &kernel.name);
        put_u32(&mut out, kernel.params.len());
        for param in &kernel.params {
            put_str(&mut out, &param.binding);
            let mode = match param.kind {
                TextureKind::Texture => param.mode.tag(),
                TextureKind::Surface => ReadMode::Raw.tag(),
            };
            out.extend_from_slice(&[param.kind.tag(), param.dims, mode]);
        }
    }
    out
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], SideTableError> {
        if self.bytes.len() < len {
            return Err(SideTableError::Truncated);
        }
        let (head, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, SideTableError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<usize, SideTableError> {
        let mut buf = [0; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf) as usize)
    }

    fn string(&mut self) -> Result<String, SideTableError> {
        let len = self.u32()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SideTableError::BadName)
    }
}

/// Parse a side-table written by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<KernelTextures>, SideTableError> {
    let mut reader = Reader { bytes };
    if reader.take(TAG.len()).map_err(|_| SideTableError::BadTag)? != TAG {
        return Err(SideTableError::BadTag);
    }
    let count = reader.u32()?;
    let mut kernels = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let name = reader.string()?;
        let params_len = reader.u32()?;
        let mut params = Vec::with_capacity(params_len.min(64));
        for _ in 0..params_len {
            let binding = reader.string()?;
            let kind = match reader.u8()? {
                0 => TextureKind::Texture,
                1 => TextureKind::Surface,
                other => return Err(SideTableError::BadKind(other)),
            };
            let dims = reader.u8()?;
            let mode = match reader.u8()? {
                b'u' => ReadMode::Raw,
                b'n' => ReadMode::Normalized,
                other => return Err(SideTableError::BadMode(other)),
            };
            params.push(BoundParam {
                binding,
                kind,
                dims,
                mode,
            });
        }
        kernels.push(KernelTextures { name, params });
    }
    Ok(kernels)
}

/// Encode and write to `path`, replacing any existing file.
pub fn write(path: &Path, kernels: &[KernelTextures]) -> Result<(), TransformError> {
    std::fs::write(path, encode(kernels)).map_err(|source| {
        TransformError::new(
            0,
            TransformErrorKind::SideTable {
                path: path.to_path_buf(),
                source,
            },
        )
    })
}
