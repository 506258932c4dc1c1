//! Owned kernel source with a trailing `0x00`.
//!
//! The raw scanner stops on the sentinel instead of comparing positions
//! against the length on every byte.

use crate::Cursor;

/// A copy of one kernel file followed by a single `0x00` byte.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    bytes: Vec<u8>,
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` and terminate it.
    ///
    /// Files over `u32::MAX` bytes saturate the length and are scanned only
    /// up to it.
    pub fn new(source: &str) -> Self {
        let mut bytes = Vec::with_capacity(source.len() + 1);
        bytes.extend_from_slice(source.as_bytes());
        bytes.push(0);
        SourceBuffer {
            bytes,
            source_len: u32::try_from(source.len()).unwrap_or(u32::MAX),
        }
    }

    /// The source text, without the sentinel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.source_len as usize]
    }

    /// The source text followed by the sentinel.
    pub fn as_sentinel_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.bytes, self.source_len)
    }

    pub fn len(&self) -> u32 {
        self.source_len
    }

    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}

#[cfg(test)]
mod tests;
