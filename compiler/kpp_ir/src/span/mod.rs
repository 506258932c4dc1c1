//! Source byte spans.

use std::fmt;

/// Byte range into the source buffer.
///
/// Layout: 8 bytes total (`start` inclusive, `end` exclusive).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Span of `len` bytes starting at `start`.
    #[inline]
    pub const fn at(start: u32, len: u32) -> Self {
        Span {
            start,
            end: start + len,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

crate::static_assert_size!(Span, 8);

#[cfg(test)]
mod tests;
