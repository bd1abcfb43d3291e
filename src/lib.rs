//! # lumen
//!
//! A grammar-driven tokenizer core for syntax highlighting.
//!
//! Lumen converts a source string plus a language grammar into a nested
//! stream of typed tokens suitable for downstream rendering. Grammars are
//! ordered collections of named regex rules; the engine applies them in
//! declaration order, splices matches into a fragment list, and recurses
//! into structured tokens with nested sub-grammars. The crate is headless:
//! input is `(text, grammar)`, output is a token tree.

pub mod highlight;

pub use highlight::{
    detokenize, tokenize, tokenize_with, Fragment, Grammar, GrammarError, GrammarRef, Registry,
    Rule, Token, TokenContent,
};
