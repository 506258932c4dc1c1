//! Raw token tags produced by the scanner.

/// Operator characters that form one-character tokens on their own.
pub const SINGLE_OPERATORS: &[u8] = b"()[]{}<>,;:.+-*/%=!~&|^?#\\";

/// Character pairs matched greedily before falling back to single characters.
pub const PAIR_OPERATORS: &[[u8; 2]] = &[
    *b"<=", *b">=", *b"==", *b"!=", *b"<<", *b">>", *b"++", *b"--", *b"->", *b"&&", *b"||",
    *b"+=", *b"-=", *b"*=", *b"/=", *b"%=", *b"&=", *b"|=", *b"^=", *b"::", *b"##",
];

/// Classification of one raw token.
///
/// Error conditions are encoded as variants rather than `Result::Err`; the
/// integration layer turns them into a persistent lexer error state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawTag {
    /// Spaces, tabs, form feeds, vertical tabs and lone `\r`.
    Whitespace,
    /// `\n` or `\r\n`.
    Newline,
    /// `// ...` up to (not including) the newline.
    LineComment,
    /// `/* ... */`, first terminator wins.
    BlockComment,
    /// Identifier-leading run.
    Ident,
    /// Digit- or dot-leading run. No numeric value is parsed.
    Number,
    /// `"..."` or `'...'` with backslash escapes.
    String,
    /// One-character operator; the byte is its own identity.
    Single(u8),
    /// Two-character operator from [`PAIR_OPERATORS`].
    Pair([u8; 2]),

    // === Errors ===
    /// Quoted run reached a newline or EOF before its closing quote.
    UnterminatedString,
    /// `/*` with no matching `*/`.
    UnterminatedComment,
    /// Byte outside every token class.
    InvalidByte(u8),
    /// Null byte inside the source content.
    InteriorNull,

    /// End of input (`len == 0`).
    Eof,
}

impl RawTag {
    /// Returns `true` for the error variants.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            RawTag::UnterminatedString
                | RawTag::UnterminatedComment
                | RawTag::InvalidByte(_)
                | RawTag::InteriorNull
        )
    }
}

/// A `(tag, length)` pair. The start offset is implied by scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}
