//! Language registry and grammar composition
//!
//! The registry maps language ids to grammars. It is expected to be
//! populated at startup and read-mostly afterwards; the composition
//! helpers [`extend`](Registry::extend) and
//! [`insert_before`](Registry::insert_before) are the only writers. Two ids
//! may share one grammar (an alias such as `plaintext` / `txt`), and shared
//! ids follow each other through composition edits.
//!
//! Most callers use an explicit `Registry` instance; [`Registry::global`]
//! provides the process-wide one that the free
//! [`tokenize`](crate::highlight::tokenizer::tokenize) resolves named
//! references against.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::highlight::grammar::{Grammar, GrammarError};
use crate::highlight::token::Fragment;
use crate::highlight::tokenizer;

/// Mapping from language id to grammar.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    languages: HashMap<String, Arc<Grammar>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            languages: HashMap::new(),
        }
    }

    /// Register `grammar` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: impl Into<String>, grammar: Grammar) {
        self.languages.insert(id.into(), Arc::new(grammar));
    }

    /// Register `alias` as a second id for the grammar under `id`.
    ///
    /// Both ids share one grammar; a later `insert_before` on either id
    /// re-points the other as well.
    pub fn register_alias(
        &mut self,
        id: &str,
        alias: impl Into<String>,
    ) -> Result<(), GrammarError> {
        let grammar = self
            .languages
            .get(id)
            .cloned()
            .ok_or_else(|| GrammarError::UnknownLanguage(id.to_string()))?;
        self.languages.insert(alias.into(), grammar);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Grammar>> {
        self.languages.get(id).cloned()
    }

    pub fn has(&self, id: &str) -> bool {
        self.languages.contains_key(id)
    }

    /// Sorted list of registered language ids.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<_> = self.languages.keys().cloned().collect();
        names.sort();
        names
    }

    /// Tokenize `text` with the grammar registered under `language`.
    pub fn tokenize(&self, text: &str, language: &str) -> Result<Vec<Fragment>, GrammarError> {
        let grammar = self
            .get(language)
            .ok_or_else(|| GrammarError::UnknownLanguage(language.to_string()))?;
        Ok(tokenizer::tokenize_with(text, &grammar, self))
    }

    /// Deep-copy the grammar under `id` and apply `redef` on top: an entry
    /// whose name already exists replaces it in place, anything else is
    /// appended at the end.
    ///
    /// The returned grammar is not registered; the original grammar and the
    /// registry are unaffected.
    pub fn extend(&self, id: &str, redef: Grammar) -> Result<Grammar, GrammarError> {
        let base = self
            .languages
            .get(id)
            .ok_or_else(|| GrammarError::UnknownLanguage(id.to_string()))?;
        let mut lang = (**base).clone();
        for (name, rules) in redef.iter() {
            lang.insert(name, rules.to_vec());
        }
        if redef.rest.is_some() {
            lang.rest = redef.rest.clone();
        }
        Ok(lang)
    }

    /// Rebuild the grammar under `inside` with the entries of `insert`
    /// placed immediately before the rule named `before`.
    ///
    /// Entries of the target that share a name with an inserted entry are
    /// dropped, so `insert` both overrides and adds. Registry ids that
    /// shared the old grammar are re-pointed at the rebuilt one; `inside`
    /// references by language id observe the edit on their next resolution.
    /// Any `rest` on `insert` is ignored.
    pub fn insert_before(
        &mut self,
        inside: &str,
        before: &str,
        insert: Grammar,
    ) -> Result<Arc<Grammar>, GrammarError> {
        let old = self
            .languages
            .get(inside)
            .cloned()
            .ok_or_else(|| GrammarError::UnknownLanguage(inside.to_string()))?;
        if !old.contains(before) {
            return Err(GrammarError::UnknownRule {
                language: inside.to_string(),
                rule: before.to_string(),
            });
        }

        let mut updated = Grammar::new();
        for (name, rules) in old.iter() {
            if name == before {
                for (new_name, new_rules) in insert.iter() {
                    updated.insert(new_name, new_rules.to_vec());
                }
            }
            if !insert.contains(name) {
                updated.insert(name, rules.to_vec());
            }
        }
        updated.rest = old.rest.clone();

        let updated = Arc::new(updated);
        self.languages.insert(inside.to_string(), updated.clone());
        for (id, grammar) in self.languages.iter_mut() {
            if id.as_str() != inside && Arc::ptr_eq(grammar, &old) {
                *grammar = updated.clone();
            }
        }
        Ok(updated)
    }

    /// The process-wide registry.
    pub fn global() -> &'static RwLock<Registry> {
        static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
        REGISTRY.get_or_init(|| RwLock::new(Registry::new()))
    }
}
