//! Tokenizer engine
//!
//! This module orchestrates the complete tokenization pass for one input.
//!
//! Structure:
//! The engine seeds a fragment list with the whole input, then applies
//! every grammar rule in declaration order. For each pattern it walks
//! the list, matching non-greedy patterns against individual raw
//! fragments and greedy patterns against the full input anchored at the
//! cursor's absolute position. A hit is spliced in place: leading
//! slice, token, trailing slice. Rules declared earlier therefore win
//! at every position, and regions wrapped in a token are closed to
//! later rules.
//!
//! Greedy rematching
//!
//! A greedy hit may span fragments that earlier (non-greedy) rules
//! already tokenized. Those tokens are removed and replaced by the one
//! greedy token, which re-opens the surrounding raw text to rules that
//! already ran. The engine then re-enters itself over the affected
//! region, guarded by the (rule, alternative) pair that caused the
//! rematch and by `reach`, the furthest position the pass must scan.
//! The cause guard stops the pass at the causing pattern, and `reach`
//! only ever grows within one invocation, so rematching terminates.
//!
//! Termination
//!
//! Every splice either advances the cursor or produces a token of
//! positive length. A zero-length token grows the list instead, and a
//! list holding more nodes than the input has bytes trips the safety
//! valve: the current pass aborts, keeping the tokens produced so far.

use crate::highlight::grammar::{Grammar, GrammarRef, Rule};
use crate::highlight::pattern::{match_at, PatternHit};
use crate::highlight::registry::Registry;
use crate::highlight::stream::{FragmentList, NodeIndex};
use crate::highlight::token::{Fragment, Token, TokenContent};

/// Tokenize `text` with `grammar`, resolving named grammar references
/// through the global registry.
///
/// Callers holding a lock on [`Registry::global`] must use
/// [`tokenize_with`] instead.
pub fn tokenize(text: &str, grammar: &Grammar) -> Vec<Fragment> {
    let registry = Registry::global().read().unwrap();
    tokenize_with(text, grammar, &registry)
}

/// Tokenize `text` with `grammar`, resolving named grammar references
/// through `registry`.
pub fn tokenize_with(text: &str, grammar: &Grammar, registry: &Registry) -> Vec<Fragment> {
    let entries = grammar.effective_entries(registry);
    let mut list = FragmentList::new();
    list.add_after(FragmentList::HEAD, Fragment::Text(text.to_string()));
    match_grammar(text, &mut list, &entries, FragmentList::HEAD, 0, None, registry);
    list.into_fragments()
}

/// State of a greedy-triggered rematch pass: the (rule, alternative) pair
/// that caused it, and the furthest position the pass must scan.
struct Rematch {
    cause: (usize, usize),
    reach: usize,
}

fn match_grammar(
    text: &str,
    list: &mut FragmentList,
    entries: &[(String, Vec<Rule>)],
    start_node: NodeIndex,
    start_pos: usize,
    mut rematch: Option<&mut Rematch>,
    registry: &Registry,
) {
    for (rule_index, (name, rules)) in entries.iter().enumerate() {
        for (alt_index, rule) in rules.iter().enumerate() {
            if let Some(cause) = rematch.as_deref().map(|r| r.cause) {
                if cause == (rule_index, alt_index) {
                    // Reaching the pattern that triggered this rematch pass:
                    // running it again would re-open the region it just closed.
                    return;
                }
            }

            let mut node = list.next(start_node);
            let mut pos = start_pos;

            while node != FragmentList::TAIL {
                if let Some(reach) = rematch.as_deref().map(|r| r.reach) {
                    if pos >= reach {
                        break;
                    }
                }

                if list.len() > text.len() {
                    // The list can only outgrow the input if an invariant is
                    // already broken; abort instead of looping.
                    return;
                }

                if list.is_token(node) {
                    pos += list.fragment_len(node);
                    node = list.next(node);
                    continue;
                }

                // Segment of `text` the splice replaces and the hit inside
                // it, both in absolute byte offsets.
                let seg_start: usize;
                let seg_end: usize;
                let hit: PatternHit;
                let mut remove_count = 1;

                if rule.is_greedy() {
                    let Some(found) = match_at(rule.pattern(), text, pos, rule.is_lookbehind())
                    else {
                        break;
                    };
                    if found.start >= text.len() {
                        break;
                    }

                    // Walk to the node containing the hit's start.
                    let mut p = pos + list.fragment_len(node);
                    while found.start >= p && node != FragmentList::TAIL {
                        node = list.next(node);
                        p += list.fragment_len(node);
                    }
                    if node == FragmentList::TAIL {
                        break;
                    }
                    p -= list.fragment_len(node);
                    pos = p;

                    if list.is_token(node) {
                        // The hit starts inside an existing token; resume
                        // scanning past it.
                        pos += list.fragment_len(node);
                        node = list.next(node);
                        continue;
                    }

                    // Collect every node the hit spans, absorbing a trailing
                    // raw fragment so the reinserted tail cannot land next
                    // to another raw fragment.
                    let mut last = node;
                    while last != FragmentList::TAIL
                        && (p < found.end || !list.is_token(last))
                    {
                        remove_count += 1;
                        p += list.fragment_len(last);
                        last = list.next(last);
                    }
                    remove_count -= 1;

                    seg_start = pos;
                    seg_end = p;
                    hit = found;
                } else {
                    let frag_len = list.fragment_len(node);
                    let segment = &text[pos..pos + frag_len];
                    let Some(found) = match_at(rule.pattern(), segment, 0, rule.is_lookbehind())
                    else {
                        pos += frag_len;
                        node = list.next(node);
                        continue;
                    };
                    seg_start = pos;
                    seg_end = pos + frag_len;
                    hit = PatternHit {
                        start: pos + found.start,
                        end: pos + found.end,
                    };
                }

                let before = &text[seg_start..hit.start];
                let matched = &text[hit.start..hit.end];
                let after = &text[hit.end..seg_end];

                let reach = seg_end;
                if let Some(r) = rematch.as_deref_mut() {
                    if reach > r.reach {
                        r.reach = reach;
                    }
                }

                let mut splice_at = list.prev(node);
                if !before.is_empty() {
                    splice_at = list.add_after(splice_at, Fragment::Text(before.to_string()));
                    pos += before.len();
                }

                list.remove_range(splice_at, remove_count);

                let content = nested_content(matched, rule, registry);
                let token = Token::new(name.clone(), content, rule.aliases().to_vec(), matched.len());
                node = list.add_after(splice_at, Fragment::Token(token));

                if !after.is_empty() {
                    list.add_after(node, Fragment::Text(after.to_string()));
                }

                if remove_count > 1 {
                    // The splice swallowed at least one existing token (only
                    // a greedy match can), so earlier rules get another pass
                    // over the re-opened region.
                    let mut nested = Rematch {
                        cause: (rule_index, alt_index),
                        reach,
                    };
                    match_grammar(
                        text,
                        list,
                        entries,
                        list.prev(node),
                        pos,
                        Some(&mut nested),
                        registry,
                    );
                    if let Some(r) = rematch.as_deref_mut() {
                        if nested.reach > r.reach {
                            r.reach = nested.reach;
                        }
                    }
                }

                pos += list.fragment_len(node);
                node = list.next(node);
            }
        }
    }
}

fn nested_content(matched: &str, rule: &Rule, registry: &Registry) -> TokenContent {
    match rule.inside_ref() {
        Some(GrammarRef::Inline(grammar)) => {
            TokenContent::Fragments(tokenize_with(matched, grammar, registry))
        }
        Some(GrammarRef::Lang(id)) => match registry.get(id) {
            Some(grammar) => TokenContent::Fragments(tokenize_with(matched, &grammar, registry)),
            None => TokenContent::Text(matched.to_string()),
        },
        None => TokenContent::Text(matched.to_string()),
    }
}
