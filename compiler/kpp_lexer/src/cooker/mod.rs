//! Raw tag to token kind mapping.
//!
//! Operators map 1:1, identifiers go through keyword lookup, error tags
//! become a [`LexErrorKind`].

use kpp_ir::TokenKind;
use kpp_lexer_core::RawTag;

use crate::LexErrorKind;

/// Classify one raw token. `text` is the token's source slice.
///
/// Returns `Ok(None)` for [`RawTag::Eof`].
pub(crate) fn cook(tag: RawTag, text: &str) -> Result<Option<TokenKind>, LexErrorKind> {
    let kind = match tag {
        RawTag::Whitespace => TokenKind::Whitespace,
        RawTag::Newline => TokenKind::Eol,
        RawTag::LineComment | RawTag::BlockComment => TokenKind::Comment,
        RawTag::Ident => TokenKind::keyword(text).unwrap_or(TokenKind::Symbol),
        RawTag::Number => TokenKind::Number,
        RawTag::String => TokenKind::String,
        RawTag::Single(byte) => {
            TokenKind::from_single(byte).ok_or(LexErrorKind::IllegalCharacter(char::from(byte)))?
        }
        RawTag::Pair(pair) => TokenKind::from_pair(pair)
            .ok_or(LexErrorKind::IllegalCharacter(char::from(pair[0])))?,
        RawTag::UnterminatedString => return Err(LexErrorKind::UnterminatedString),
        RawTag::UnterminatedComment => return Err(LexErrorKind::UnterminatedComment),
        RawTag::InvalidByte(byte) => {
            return Err(LexErrorKind::IllegalCharacter(
                text.chars().next().unwrap_or(char::from(byte)),
            ))
        }
        RawTag::InteriorNull => return Err(LexErrorKind::InteriorNull),
        RawTag::Eof => return Ok(None),
    };
    Ok(Some(kind))
}
