//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! The scanner operates on a sentinel-terminated [`Cursor`] and never
//! allocates. It finds token boundaries only: keywords are not resolved and
//! numbers are not parsed. Those decisions belong to the integration layer.
//!
//! # Design
//!
//! Main dispatch is a single `match` on the current byte. Each arm calls a
//! focused method that advances the cursor and returns `RawToken { tag, len }`.
//! The sentinel byte (`0x00`) dispatches to `eof()`.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken, PAIR_OPERATORS, SINGLE_OPERATORS};

/// Allocation-free scanner. Produces one token per call.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> RawScanner<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self { cursor }
    }

    /// Byte offset of the next token.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` with `len == 0` when the source is exhausted.
    /// Subsequent calls after EOF continue to return `Eof`.
    #[inline]
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        match self.cursor.current() {
            0 => self.eof(start),
            b' ' | b'\t' | 0x0B | 0x0C => self.whitespace(start),
            b'\r' => self.carriage_return(start),
            b'\n' => self.newline(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'.' => self.dot(start),
            b'"' => self.quoted(start, b'"'),
            b'\'' => self.quoted(start, b'\''),
            b'/' => self.slash(start),
            byte => self.operator(start, byte),
        }
    }

    fn token(&self, start: u32, tag: RawTag) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    // --- EOF ----------------------------------------------------------------

    fn eof(&mut self, start: u32) -> RawToken {
        if self.cursor.is_eof() {
            RawToken {
                tag: RawTag::Eof,
                len: 0,
            }
        } else {
            self.cursor.advance();
            self.token(start, RawTag::InteriorNull)
        }
    }

    // --- Whitespace & Newlines ----------------------------------------------

    fn whitespace(&mut self, start: u32) -> RawToken {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | 0x0B | 0x0C => self.cursor.advance(),
                // A lone `\r` is horizontal whitespace; `\r\n` ends the run.
                b'\r' if self.cursor.peek() != b'\n' => self.cursor.advance(),
                _ => break,
            }
        }
        self.token(start, RawTag::Whitespace)
    }

    fn carriage_return(&mut self, start: u32) -> RawToken {
        if self.cursor.peek() == b'\n' {
            self.cursor.advance_n(2);
            self.token(start, RawTag::Newline)
        } else {
            self.whitespace(start)
        }
    }

    fn newline(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.token(start, RawTag::Newline)
    }

    // --- Comments -----------------------------------------------------------

    fn slash(&mut self, start: u32) -> RawToken {
        match self.cursor.peek() {
            b'/' => {
                self.cursor.advance_n(2);
                self.cursor.eat_until_newline_or_eof();
                self.token(start, RawTag::LineComment)
            }
            b'*' => {
                self.cursor.advance_n(2);
                if self.cursor.eat_past_block_comment_end() {
                    self.token(start, RawTag::BlockComment)
                } else {
                    self.token(start, RawTag::UnterminatedComment)
                }
            }
            _ => self.operator(start, b'/'),
        }
    }

    // --- Identifiers & Numbers ----------------------------------------------

    fn identifier(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        self.token(start, RawTag::Ident)
    }

    fn dot(&mut self, start: u32) -> RawToken {
        if self.cursor.peek().is_ascii_digit() {
            self.number(start)
        } else {
            self.operator(start, b'.')
        }
    }

    /// Digit- or dot-leading run.
    ///
    /// Consumes identifier characters and dots, plus a sign directly after
    /// a decimal exponent (`e`/`E`) or a hex-float exponent (`p`/`P`).
    fn number(&mut self, start: u32) -> RawToken {
        let is_hex = self.cursor.current() == b'0' && matches!(self.cursor.peek(), b'x' | b'X');
        let mut prev = self.cursor.current();
        self.cursor.advance();
        loop {
            let b = self.cursor.current();
            let exponent_sign = matches!(b, b'+' | b'-')
                && if is_hex {
                    matches!(prev, b'p' | b'P')
                } else {
                    matches!(prev, b'e' | b'E' | b'p' | b'P')
                };
            if is_ident_continue(b) || b == b'.' || exponent_sign {
                prev = b;
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.token(start, RawTag::Number)
    }

    // --- Strings ------------------------------------------------------------

    /// Quoted run honoring backslash escapes.
    ///
    /// A backslash escapes whatever follows it, newline included, so a line
    /// continuation inside a string keeps the literal open.
    fn quoted(&mut self, start: u32, quote: u8) -> RawToken {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.skip_to_quote_delim(quote) {
                b'\\' => {
                    self.cursor.advance();
                    if self.cursor.current() == b'\r' && self.cursor.peek() == b'\n' {
                        self.cursor.advance_n(2);
                    } else if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                b'\n' | b'\r' | 0 => return self.token(start, RawTag::UnterminatedString),
                _ => {
                    self.cursor.advance(); // closing quote
                    return self.token(start, RawTag::String);
                }
            }
        }
    }

    // --- Operators ----------------------------------------------------------

    fn operator(&mut self, start: u32, byte: u8) -> RawToken {
        let pair = [byte, self.cursor.peek()];
        if PAIR_OPERATORS.contains(&pair) {
            self.cursor.advance_n(2);
            self.token(start, RawTag::Pair(pair))
        } else if SINGLE_OPERATORS.contains(&byte) {
            self.cursor.advance();
            self.token(start, RawTag::Single(byte))
        } else {
            self.invalid_byte(start, byte)
        }
    }

    fn invalid_byte(&mut self, start: u32, byte: u8) -> RawToken {
        self.cursor.advance();
        self.token(start, RawTag::InvalidByte(byte))
    }
}

impl Iterator for RawScanner<'_> {
    type Item = RawToken;

    /// Yields tokens until EOF. The `Eof` token itself is not yielded.
    fn next(&mut self) -> Option<RawToken> {
        let token = self.next_token();
        if token.tag == RawTag::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan the whole source into raw tokens (excluding EOF).
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let buf = crate::SourceBuffer::new(source);
    RawScanner::new(buf.cursor()).collect()
}
