//! kpp IR - token storage and the syntax skeleton.
//!
//! - [`TokenList`]: arena of tokens chained by intrusive `prev`/`next` links.
//!   It is the single owner of every token and the single source of truth for
//!   the emitted text.
//! - [`NodeTree`]: first-child/next-sibling tree whose nodes reference
//!   inclusive [`TokenRange`]s of the list instead of owning text.
//!
//! Tokens and nodes are addressed by stable `u32` handles. A deleted token's
//! slot is never reused, so a stale [`TokenId`] resolves to `None` instead of
//! aliasing a newer token.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod span;
mod token;

pub use node::{Children, Node, NodeId, NodeKind, NodeTree};
pub use span::Span;
pub use token::{
    content_hash, Splice, SpliceError, Token, TokenId, TokenIter, TokenKind, TokenList, TokenRange,
    TokenText,
};
