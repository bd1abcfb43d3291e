//! Property-based tests for the tokenizer invariants
//!
//! These hold for arbitrary input, including inputs with unterminated
//! strings and comments: the output projection reproduces the input, token
//! lengths account for the text they cover, and the fragment sequence never
//! carries adjacent or empty raw fragments.

use lumen::highlight::testing::{clike, word_grammar};
use lumen::highlight::{detokenize, tokenize_with, Fragment, Registry, TokenContent};
use proptest::prelude::*;

/// Walk a fragment tree checking the structural invariants at every level.
fn check_invariants(fragments: &[Fragment], covered: &str) {
    // projection reproduces the covered text
    assert_eq!(detokenize(fragments), covered);

    // lengths account for every byte
    let total: usize = fragments.iter().map(Fragment::len).sum();
    assert_eq!(total, covered.len());

    let mut previous_raw = false;
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => {
                // the degenerate single empty fragment only appears for ""
                if !covered.is_empty() {
                    assert!(!text.is_empty(), "empty raw fragment in {:?}", covered);
                }
                assert!(!previous_raw, "adjacent raw fragments in {:?}", covered);
                previous_raw = true;
            }
            Fragment::Token(token) => {
                previous_raw = false;
                let projection = token.plain_text();
                assert_eq!(token.length(), projection.len());
                if let TokenContent::Fragments(inner) = &token.content {
                    check_invariants(inner, &projection);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn length_preserved_for_clike(input in "[ -~]{0,48}") {
        let fragments = tokenize_with(&input, &clike(), &Registry::new());
        prop_assert_eq!(detokenize(&fragments), input);
    }

    #[test]
    fn invariants_hold_for_clike(input in "[ -~]{0,48}") {
        let fragments = tokenize_with(&input, &clike(), &Registry::new());
        check_invariants(&fragments, &input);
    }

    #[test]
    fn invariants_hold_for_words(input in "\\PC{0,32}") {
        let fragments = tokenize_with(&input, &word_grammar(), &Registry::new());
        check_invariants(&fragments, &input);
    }

    #[test]
    fn token_order_covers_input_left_to_right(input in "[a-z0-9 ]{0,32}") {
        let fragments = tokenize_with(&input, &word_grammar(), &Registry::new());
        let mut offset = 0;
        for fragment in &fragments {
            let text = fragment.plain_text();
            prop_assert_eq!(&input[offset..offset + text.len()], text.as_str());
            offset += text.len();
        }
        prop_assert_eq!(offset, input.len());
    }
}
