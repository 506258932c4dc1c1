//! Token kinds.

use std::fmt;

/// Token kind.
///
/// One-character operators use their ASCII code point as the discriminant, so
/// `TokenKind::LParen as u16 == u16::from(b'(')` and dispatch on a raw byte is
/// a single lookup. Composite operators start at `0x100`; the remaining kinds
/// at `0x200`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u16)]
pub enum TokenKind {
    // === Single-character operators ===
    LParen = b'(' as u16,
    RParen = b')' as u16,
    LBracket = b'[' as u16,
    RBracket = b']' as u16,
    LBrace = b'{' as u16,
    RBrace = b'}' as u16,
    Less = b'<' as u16,
    Greater = b'>' as u16,
    Comma = b',' as u16,
    Semicolon = b';' as u16,
    Colon = b':' as u16,
    Dot = b'.' as u16,
    Plus = b'+' as u16,
    Minus = b'-' as u16,
    Star = b'*' as u16,
    Slash = b'/' as u16,
    Percent = b'%' as u16,
    Assign = b'=' as u16,
    Bang = b'!' as u16,
    Tilde = b'~' as u16,
    Amp = b'&' as u16,
    Pipe = b'|' as u16,
    Caret = b'^' as u16,
    Question = b'?' as u16,
    Hash = b'#' as u16,
    Backslash = b'\\' as u16,

    // === Composite operators ===
    LessEq = 0x100,
    GreaterEq,
    EqEq,
    NotEq,
    Shl,
    Shr,
    PlusPlus,
    MinusMinus,
    Arrow,
    AndAnd,
    OrOr,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ColonColon,
    HashHash,

    // === Everything else ===
    Comment = 0x200,
    String,
    Number,
    Symbol,
    Whitespace,
    Eol,
    Typedef,
    Struct,
}

impl TokenKind {
    /// Kind for a one-character operator.
    pub fn from_single(byte: u8) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match byte {
            b'(' => LParen,
            b')' => RParen,
            b'[' => LBracket,
            b']' => RBracket,
            b'{' => LBrace,
            b'}' => RBrace,
            b'<' => Less,
            b'>' => Greater,
            b',' => Comma,
            b';' => Semicolon,
            b':' => Colon,
            b'.' => Dot,
            b'+' => Plus,
            b'-' => Minus,
            b'*' => Star,
            b'/' => Slash,
            b'%' => Percent,
            b'=' => Assign,
            b'!' => Bang,
            b'~' => Tilde,
            b'&' => Amp,
            b'|' => Pipe,
            b'^' => Caret,
            b'?' => Question,
            b'#' => Hash,
            b'\\' => Backslash,
            _ => return None,
        })
    }

    /// Kind for a two-character operator.
    pub fn from_pair(pair: [u8; 2]) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match &pair {
            b"<=" => LessEq,
            b">=" => GreaterEq,
            b"==" => EqEq,
            b"!=" => NotEq,
            b"<<" => Shl,
            b">>" => Shr,
            b"++" => PlusPlus,
            b"--" => MinusMinus,
            b"->" => Arrow,
            b"&&" => AndAnd,
            b"||" => OrOr,
            b"+=" => PlusAssign,
            b"-=" => MinusAssign,
            b"*=" => StarAssign,
            b"/=" => SlashAssign,
            b"%=" => PercentAssign,
            b"&=" => AmpAssign,
            b"|=" => PipeAssign,
            b"^=" => CaretAssign,
            b"::" => ColonColon,
            b"##" => HashHash,
            _ => return None,
        })
    }

    /// Keyword kind for an identifier, if it is one.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "typedef" => Some(TokenKind::Typedef),
            "struct" => Some(TokenKind::Struct),
            _ => None,
        }
    }

    /// The operator character, for one-character operators.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by the < 0x80 check"
    )]
    pub fn as_char(self) -> Option<char> {
        let raw = self as u16;
        (raw < 0x80).then_some(raw as u8 as char)
    }

    /// Whitespace, end-of-line and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Eol | TokenKind::Comment
        )
    }

    /// Kinds whose text is hashed at creation.
    #[inline]
    pub fn is_hashed(self) -> bool {
        matches!(
            self,
            TokenKind::Symbol | TokenKind::Typedef | TokenKind::Struct
        )
    }

    /// Fixed spelling for operators and keywords.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            Less => "<",
            Greater => ">",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            Dot => ".",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Assign => "=",
            Bang => "!",
            Tilde => "~",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Question => "?",
            Hash => "#",
            Backslash => "\\",
            LessEq => "<=",
            GreaterEq => ">=",
            EqEq => "==",
            NotEq => "!=",
            Shl => "<<",
            Shr => ">>",
            PlusPlus => "++",
            MinusMinus => "--",
            Arrow => "->",
            AndAnd => "&&",
            OrOr => "||",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            AmpAssign => "&=",
            PipeAssign => "|=",
            CaretAssign => "^=",
            ColonColon => "::",
            HashHash => "##",
            Typedef => "typedef",
            Struct => "struct",
            Comment | String | Number | Symbol | Whitespace | Eol => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spelling() {
            Some(s) => write!(f, "`{s}`"),
            None => match self {
                TokenKind::Comment => write!(f, "comment"),
                TokenKind::String => write!(f, "string literal"),
                TokenKind::Number => write!(f, "number"),
                TokenKind::Symbol => write!(f, "identifier"),
                TokenKind::Whitespace => write!(f, "whitespace"),
                _ => write!(f, "end of line"),
            },
        }
    }
}
