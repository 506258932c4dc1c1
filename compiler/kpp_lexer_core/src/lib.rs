//! Low-level tokenizer for C-like kernel sources.
//!
//! This crate knows nothing about token lists, nodes or transforms. It turns
//! a byte buffer into `(RawTag, len)` pairs that the integration layer
//! (`kpp_lexer`) links into a `TokenList`.
//!
//! # Layers
//!
//! - [`SourceBuffer`]: owned copy of the source with a `0x00` sentinel.
//! - [`Cursor`]: byte cursor over the sentinel-terminated buffer.
//! - [`RawScanner`]: classification of the next token boundary.
//!
//! Every byte of the source belongs to exactly one raw token, whitespace and
//! newlines included, so concatenating the token slices reproduces the input.

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::{tokenize, RawScanner};
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken, PAIR_OPERATORS, SINGLE_OPERATORS};
