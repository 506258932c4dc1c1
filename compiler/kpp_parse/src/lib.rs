//! Parser for kpp kernel sources.
//!
//! Builds the syntax skeleton: a [`NodeTree`](kpp_ir::NodeTree) whose nodes
//! reference token ranges of a [`TokenList`](kpp_ir::TokenList). Only the
//! structure transforms need is recognized:
//!
//! - preprocessor directive lines (with `\` continuations)
//! - `typedef ... ;`
//! - struct declarations and definitions
//! - function declarations and definitions, with parameter list and body
//! - statements and nested statement blocks
//!
//! Whitespace, newlines and comments stay in the list and are skipped
//! structurally. A node's range runs from the first to the last significant
//! token it consumed.

mod cursor;
mod dump;
mod error;
mod grammar;
mod shape;

pub use dump::{dump_tree, snippet};
pub use error::{ParseError, ParseErrorKind};
pub use grammar::{parse, Parser};
pub use shape::{function_body, function_name, function_params, is_kernel};
