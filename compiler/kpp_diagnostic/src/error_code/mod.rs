//! Error codes for all preprocessor diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the phase that raised it.

use std::fmt;

/// Error codes for all preprocessor diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Transform errors
/// - E3xxx: Side-table I/O errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Illegal character in source
    E0002,
    /// Unterminated block comment
    E0003,
    /// NUL byte inside the source
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Unbalanced braces or parentheses
    E1002,
    /// Unexpected end of input
    E1003,

    // Transform Errors (E2xxx)
    /// Missing `<` after a texture keyword
    E2001,
    /// Missing texel type
    E2002,
    /// Missing closing `>`
    E2003,
    /// `signed`/`unsigned` not followed by exactly one basic type
    E2004,
    /// Missing parameter name
    E2005,
    /// No enclosing container for a texture occurrence
    E2006,
    /// No function name before a parameter list
    E2007,

    // Side-table Errors (E3xxx)
    /// Binary side-table could not be written
    E3001,

    // Internal Errors (E9xxx)
    /// Token list or node tree invariant broken
    E9001,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E3001,
        ErrorCode::E9001,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description, for `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "illegal character",
            ErrorCode::E0003 => "unterminated block comment",
            ErrorCode::E0004 => "NUL byte in source",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "unbalanced delimiters",
            ErrorCode::E1003 => "unexpected end of input",
            ErrorCode::E2001 => "texture keyword without `<`",
            ErrorCode::E2002 => "texture without texel type",
            ErrorCode::E2003 => "texture without closing `>`",
            ErrorCode::E2004 => "bad signed/unsigned texel type",
            ErrorCode::E2005 => "texture parameter without a name",
            ErrorCode::E2006 => "texture outside any container",
            ErrorCode::E2007 => "function without a name",
            ErrorCode::E3001 => "side-table write failed",
            ErrorCode::E9001 => "internal invariant broken",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E0001 | ErrorCode::E0002 | ErrorCode::E0003 | ErrorCode::E0004
        )
    }

    /// Check if this is a parser error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003)
    }

    /// Check if this is a transform error (E2xxx range).
    pub fn is_transform_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
        )
    }

    /// Check if this is a side-table I/O error (E3xxx range).
    pub fn is_io_error(&self) -> bool {
        matches!(self, ErrorCode::E3001)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
