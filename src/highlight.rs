//! Main module for the highlighting tokenizer
//!
//! The pipeline is small: a [`Grammar`] describes a language as ordered
//! regex rules, the [`tokenizer`] walks a fragment list applying them, and
//! the result is an ordered sequence of [`Fragment`]s. The [`Registry`]
//! holds registered languages and the composition helpers that derive one
//! language from another.

pub mod grammar;
pub mod registry;
pub mod testing;
pub mod token;
pub mod tokenizer;

pub(crate) mod pattern;
pub(crate) mod stream;

pub use grammar::{Grammar, GrammarError, GrammarRef, Rule};
pub use registry::Registry;
pub use token::{detokenize, Fragment, Token, TokenContent};
pub use tokenizer::{tokenize, tokenize_with};
