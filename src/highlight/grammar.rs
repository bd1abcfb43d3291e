//! Grammar data model
//!
//! A grammar is an ordered collection of named rules. Order is
//! semantically significant: the tokenizer tries earlier rules first at
//! every position, so grammars put the most specific rules (comments,
//! strings) before the general ones (identifiers, operators).
//!
//! Each rule carries one or more alternative patterns. A pattern is a
//! compiled regex plus metadata:
//!
//! - lookbehind: the text captured by group 1 is preceding context,
//!   excluded from the produced token;
//! - greedy: the pattern may match across fragment boundaries and
//!   subsume previously produced tokens;
//! - alias: secondary classification labels;
//! - inside: a nested grammar that tokenizes the matched text.
//!
//! Nested grammars are referenced by registered language id (resolved
//! through the [`Registry`](crate::highlight::registry::Registry) at
//! tokenize time, so composition edits stay visible) or owned inline.
//! The reserved `rest` reference names a grammar whose entries are
//! inlined at the end when tokenizing, which lets a sub-grammar extend
//! its host language without copying it.

use std::fmt;

use regex::Regex;

use crate::highlight::registry::Registry;

/// Errors from grammar construction and composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule pattern failed to compile.
    InvalidPattern(String),
    /// Composition referenced a language id missing from the registry.
    UnknownLanguage(String),
    /// `insert_before` referenced a rule missing from the target grammar.
    UnknownRule { language: String, rule: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidPattern(msg) => write!(f, "invalid pattern: {}", msg),
            GrammarError::UnknownLanguage(id) => write!(f, "language '{}' not found", id),
            GrammarError::UnknownRule { language, rule } => {
                write!(f, "rule '{}' not found in language '{}'", rule, language)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Reference to a nested grammar.
#[derive(Debug, Clone)]
pub enum GrammarRef {
    /// A registered language id, resolved through the registry at tokenize
    /// time. Unresolved ids are inert: the matched text stays plain.
    Lang(String),
    /// An owned grammar, private to the referencing rule.
    Inline(Box<Grammar>),
}

impl GrammarRef {
    pub fn lang(id: impl Into<String>) -> Self {
        GrammarRef::Lang(id.into())
    }

    /// Run `f` against the referenced grammar, if it resolves.
    pub(crate) fn with_resolved<R>(
        &self,
        registry: &Registry,
        f: impl FnOnce(&Grammar) -> R,
    ) -> Option<R> {
        match self {
            GrammarRef::Inline(grammar) => Some(f(grammar)),
            GrammarRef::Lang(id) => registry.get(id).map(|grammar| f(grammar.as_ref())),
        }
    }
}

impl From<Grammar> for GrammarRef {
    fn from(grammar: Grammar) -> Self {
        GrammarRef::Inline(Box::new(grammar))
    }
}

impl From<&str> for GrammarRef {
    fn from(id: &str) -> Self {
        GrammarRef::Lang(id.to_string())
    }
}

/// One alternative pattern of a grammar rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    lookbehind: bool,
    greedy: bool,
    alias: Vec<String>,
    inside: Option<GrammarRef>,
}

impl Rule {
    /// Compile `pattern` into a rule.
    ///
    /// Patterns are compiled eagerly: a malformed pattern fails here, never
    /// during tokenization.
    pub fn new(pattern: &str) -> Result<Self, GrammarError> {
        let pattern =
            Regex::new(pattern).map_err(|e| GrammarError::InvalidPattern(e.to_string()))?;
        Ok(Rule {
            pattern,
            lookbehind: false,
            greedy: false,
            alias: Vec::new(),
            inside: None,
        })
    }

    /// Treat the text captured by group 1 as preceding context, excluded
    /// from the produced token.
    pub fn lookbehind(mut self) -> Self {
        self.lookbehind = true;
        self
    }

    /// Allow the pattern to match across fragment boundaries, subsuming
    /// previously produced tokens.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Attach a secondary classification label.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    /// Tokenize the matched text recursively with the referenced grammar.
    pub fn inside(mut self, grammar: impl Into<GrammarRef>) -> Self {
        self.inside = Some(grammar.into());
        self
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_lookbehind(&self) -> bool {
        self.lookbehind
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn aliases(&self) -> &[String] {
        &self.alias
    }

    pub fn inside_ref(&self) -> Option<&GrammarRef> {
        self.inside.as_ref()
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// An ordered collection of named rules describing a language.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pub(crate) entries: Vec<(String, Vec<Rule>)>,
    pub(crate) rest: Option<GrammarRef>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::default()
    }

    /// Builder form of [`Grammar::insert`] for a single-pattern rule.
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, vec![rule]);
        self
    }

    /// Builder form of [`Grammar::insert`] for a rule with several
    /// alternative patterns, tried in order.
    pub fn rules(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.insert(name, rules);
        self
    }

    /// Set the `rest` reference, inlined at the end when tokenizing.
    pub fn rest(mut self, rest: impl Into<GrammarRef>) -> Self {
        self.rest = Some(rest.into());
        self
    }

    /// Map-insert semantics: an existing name is replaced in place, keeping
    /// its position; a new name is appended at the end.
    pub fn insert(&mut self, name: impl Into<String>, rules: Vec<Rule>) {
        map_insert(&mut self.entries, name.into(), rules);
    }

    pub fn get(&self, name: &str) -> Option<&[Rule]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Rule names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Rule entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.entries
            .iter()
            .map(|(n, rules)| (n.as_str(), rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries the tokenizer actually runs: the grammar's own entries
    /// with the `rest` grammar inlined at the end, a duplicate name
    /// overwriting the earlier entry in place.
    pub(crate) fn effective_entries(&self, registry: &Registry) -> Vec<(String, Vec<Rule>)> {
        let mut entries = self.entries.clone();
        if let Some(rest) = &self.rest {
            rest.with_resolved(registry, |grammar| {
                for (name, rules) in grammar.iter() {
                    map_insert(&mut entries, name.to_string(), rules.to_vec());
                }
            });
        }
        entries
    }
}

fn map_insert(entries: &mut Vec<(String, Vec<Rule>)>, name: String, rules: Vec<Rule>) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = rules,
        None => entries.push((name, rules)),
    }
}
