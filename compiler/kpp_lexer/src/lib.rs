//! Lexer for kpp kernel sources.
//!
//! Sits between the raw scanner (`kpp_lexer_core`) and the parser:
//!
//! ```text
//! source → RawScanner → (RawTag, len) → cook → TokenKind → TokenList
//! ```
//!
//! Whitespace, newlines and comments are kept as tokens so the token list
//! reproduces the source byte for byte.

mod cooker;
mod lex_error;
mod lexer;

pub use lex_error::{LexError, LexErrorKind};
pub use lexer::{lex, Lexer};
