//! Output token tree emitted by the tokenizer.
//!
//! The tokenizer's result is an ordered sequence of fragments. A fragment
//! is either a slice of the input no rule classified, or a token carrying
//! a classification. Token content may itself be a fragment sequence when
//! the matching rule declared a nested grammar, so the output is a tree.
//!
//! Two invariants hold for every tokenizer output:
//! - concatenating the textual projection of all fragments reproduces the
//!   input exactly (see [`detokenize`]);
//! - a token's [`length`](Token::length) equals the byte length of its
//!   textual projection, and is fixed at construction.

use serde::{Deserialize, Serialize};

/// One entry of the tokenizer's output: either an unclassified slice of the
/// input or a classified [`Token`].
///
/// Serializes untagged, so raw text becomes a JSON string and tokens become
/// objects, mirroring the shape renderers consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// Raw input text no rule matched.
    Text(String),
    /// A classified region of the input.
    Token(Token),
}

impl Fragment {
    /// Shorthand for building a raw-text fragment.
    pub fn text(value: impl Into<String>) -> Self {
        Fragment::Text(value.into())
    }

    /// Byte length of the source text this fragment covers.
    pub fn len(&self) -> usize {
        match self {
            Fragment::Text(text) => text.len(),
            Fragment::Token(token) => token.length(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Fragment::Token(_))
    }

    /// The source text this fragment covers.
    pub fn plain_text(&self) -> String {
        match self {
            Fragment::Text(text) => text.clone(),
            Fragment::Token(token) => token.plain_text(),
        }
    }
}

/// A classified region of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Primary classification, e.g. `"keyword"` or `"string"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The matched text, either plain or tokenized by a nested grammar.
    pub content: TokenContent,
    /// Secondary classification labels for rendering.
    pub alias: Vec<String>,
    // Byte length of the matched text, fixed at construction.
    length: usize,
}

impl Token {
    pub fn new(
        kind: impl Into<String>,
        content: TokenContent,
        alias: Vec<String>,
        length: usize,
    ) -> Self {
        Token {
            kind: kind.into(),
            content,
            alias,
            length,
        }
    }

    /// Byte length of the originally matched text.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The matched source text, reassembled from nested content.
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }
}

/// Content of a [`Token`]: the matched text as-is, or the fragment sequence
/// produced by tokenizing it with the rule's nested grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenContent {
    Text(String),
    Fragments(Vec<Fragment>),
}

impl TokenContent {
    pub fn plain_text(&self) -> String {
        match self {
            TokenContent::Text(text) => text.clone(),
            TokenContent::Fragments(fragments) => detokenize(fragments),
        }
    }
}

/// Concatenate the textual projection of a fragment sequence.
///
/// For any tokenizer output this reproduces the tokenized input exactly.
pub fn detokenize(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    push_plain_text(&mut out, fragments);
    out
}

fn push_plain_text(out: &mut String, fragments: &[Fragment]) {
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Token(token) => match &token.content {
                TokenContent::Text(text) => out.push_str(text),
                TokenContent::Fragments(inner) => push_plain_text(out, inner),
            },
        }
    }
}
