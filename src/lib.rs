//! Renderers for grammars normalized by the `ebnf` crate.

mod format;

pub use format::{render, Format};
