//! Test factories and assertion helpers
//!
//! Shared by the unit tests and the integration suites under `tests/`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen::highlight::testing::{assert_token, clike, rule};
//! use lumen::highlight::{tokenize_with, Registry};
//!
//! let fragments = tokenize_with("if (x) { return 1; }", &clike(), &Registry::new());
//! assert_token(&fragments[0], "keyword", "if");
//! ```

use crate::highlight::grammar::{Grammar, Rule};
use crate::highlight::token::Fragment;

/// Build a single-pattern rule, panicking on a bad pattern.
pub fn rule(pattern: &str) -> Rule {
    Rule::new(pattern).expect("test pattern must compile")
}

/// The smallest useful fixture: words and numbers.
pub fn word_grammar() -> Grammar {
    Grammar::new()
        .rule("number", rule(r"\d+"))
        .rule("word", rule(r"[A-Za-z]+"))
}

/// A small C-like grammar exercising every rule feature: greedy comments
/// and strings, keywords behind a lookbehind, numbers and punctuation.
pub fn clike() -> Grammar {
    Grammar::new()
        .rule("comment", rule(r"/\*[\s\S]*?\*/").greedy())
        .rule("string", rule(r#""(?:\\.|[^"\\])*""#).greedy())
        .rule(
            "keyword",
            rule(r"(^|[^\w])(if|else|for|while|return)\b").lookbehind(),
        )
        .rule("number", rule(r"\b\d+\b"))
        .rule("punctuation", rule(r"[{}();,]"))
}

/// Assert that `fragment` is raw text equal to `expected`.
pub fn assert_text(fragment: &Fragment, expected: &str) {
    match fragment {
        Fragment::Text(text) => assert_eq!(text, expected, "raw text mismatch"),
        Fragment::Token(token) => panic!(
            "expected raw text {:?}, got '{}' token {:?}",
            expected,
            token.kind,
            token.plain_text()
        ),
    }
}

/// Assert that `fragment` is a token of `kind` whose covered text equals
/// `expected`.
pub fn assert_token(fragment: &Fragment, kind: &str, expected: &str) {
    match fragment {
        Fragment::Token(token) => {
            assert_eq!(token.kind, kind, "token kind mismatch");
            assert_eq!(token.plain_text(), expected, "token text mismatch");
        }
        Fragment::Text(text) => panic!(
            "expected '{}' token {:?}, got raw text {:?}",
            kind, expected, text
        ),
    }
}
