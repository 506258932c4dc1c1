//! Byte cursor over a sentinel-terminated buffer.
//!
//! EOF is detected when the current byte equals the sentinel (`0x00`) and the
//! position has reached the source length. A null at `pos < source_len` is an
//! interior null, which the scanner reports as an error token.

/// Returns the earliest (minimum) of two optional positions.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], so snapshots for lookahead are free.
///
/// # Invariant
///
/// `buf[source_len] == 0x00`. Reads past the buffer also yield `0x00`.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at the current position (`0x00` at EOF).
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos as usize)
    }

    /// Byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos as usize + 1)
    }

    #[inline]
    fn byte_at(&self, index: usize) -> u8 {
        self.buf.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Returns `true` once the cursor sits on the sentinel.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Source bytes in `start..end`.
    pub fn slice(&self, start: u32, end: u32) -> &'a [u8] {
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        let end = end.min(self.source_len) as usize;
        self.buf.get(start as usize..end).unwrap_or(&[])
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    fn remaining(&self) -> &'a [u8] {
        self.buf
            .get(self.pos as usize..self.source_len as usize)
            .unwrap_or(&[])
    }

    /// Advance to the next `\n` byte or EOF. The newline is not consumed.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        if let Some(offset) = memchr::memchr(b'\n', self.remaining()) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance to the first byte that can end or escape a quoted run.
    ///
    /// Interesting bytes: the closing `quote`, `\`, `\n` and `\r`. Returns the
    /// byte found, or `0` when the source ends first.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_quote_delim(&mut self, quote: u8) -> u8 {
        let remaining = self.remaining();
        let primary = memchr::memchr3(quote, b'\\', b'\n', remaining);
        let cr = memchr::memchr(b'\r', remaining);

        if let Some(off) = earliest_of(primary, cr) {
            self.pos += off as u32;
            self.current()
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance past the first `*/`, returning `false` when none exists.
    ///
    /// Nesting is not tracked: the first terminator closes the comment.
    /// On failure the cursor is left at EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_past_block_comment_end(&mut self) -> bool {
        if let Some(off) = memchr::memmem::find(self.remaining(), b"*/") {
            self.pos += off as u32 + 2;
            true
        } else {
            self.pos = self.source_len;
            false
        }
    }
}

#[cfg(test)]
mod tests;
