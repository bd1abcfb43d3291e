//! End-to-end tokenization of the basic rule features: splitting, rule
//! order, lookbehind, aliases, and nested grammars.

use lumen::highlight::testing::{assert_text, assert_token, clike, rule, word_grammar};
use lumen::highlight::{detokenize, tokenize_with, Fragment, Grammar, Registry, TokenContent};
use rstest::rstest;

fn run(text: &str, grammar: &Grammar) -> Vec<Fragment> {
    tokenize_with(text, grammar, &Registry::new())
}

#[test]
fn test_plain_text_passes_through() {
    assert_eq!(run("hello", &Grammar::new()), vec![Fragment::text("hello")]);
}

#[test]
fn test_empty_input() {
    assert_eq!(run("", &word_grammar()), vec![Fragment::text("")]);
}

#[test]
fn test_single_rule() {
    let grammar = Grammar::new().rule("num", rule(r"\d+"));
    let fragments = run("a1b22c", &grammar);
    assert_text(&fragments[0], "a");
    assert_token(&fragments[1], "num", "1");
    assert_text(&fragments[2], "b");
    assert_token(&fragments[3], "num", "22");
    assert_text(&fragments[4], "c");
}

#[test]
fn test_lookbehind_context_stays_raw() {
    let grammar = Grammar::new().rule("kw", rule(r"(^|\s)(if|else)\b").lookbehind());
    let fragments = run("if x else y", &grammar);
    assert_token(&fragments[0], "kw", "if");
    assert_text(&fragments[1], " x ");
    assert_token(&fragments[2], "kw", "else");
    assert_text(&fragments[3], " y");
}

#[test]
fn test_nested_inside_grammar() {
    let esc = Grammar::new().rule("esc", rule(r"\\."));
    let grammar = Grammar::new().rule("str", rule("\"[^\"]*\"").inside(esc));
    let fragments = run("\"a\\nb\"", &grammar);

    assert_eq!(fragments.len(), 1);
    let Fragment::Token(token) = &fragments[0] else {
        panic!("expected a str token");
    };
    assert_eq!(token.kind, "str");
    let TokenContent::Fragments(inner) = &token.content else {
        panic!("expected tokenized content");
    };
    assert_text(&inner[0], "\"a");
    assert_token(&inner[1], "esc", "\\n");
    assert_text(&inner[2], "b\"");
}

#[test]
fn test_alias_labels() {
    let grammar = Grammar::new().rule("num", rule(r"\d+").alias("constant").alias("literal"));
    let fragments = run("42", &grammar);
    let Fragment::Token(token) = &fragments[0] else {
        panic!("expected a token");
    };
    assert_eq!(token.alias, ["constant", "literal"]);
}

#[test]
fn test_clike_statement() {
    let fragments = run("if (n) { return 12; }", &clike());
    assert_token(&fragments[0], "keyword", "if");
    assert_text(&fragments[1], " ");
    assert_token(&fragments[2], "punctuation", "(");
    assert_text(&fragments[3], "n");
    assert_token(&fragments[4], "punctuation", ")");
    assert_text(&fragments[5], " ");
    assert_token(&fragments[6], "punctuation", "{");
    assert_text(&fragments[7], " ");
    assert_token(&fragments[8], "keyword", "return");
    assert_text(&fragments[9], " ");
    assert_token(&fragments[10], "number", "12");
    assert_token(&fragments[11], "punctuation", ";");
    assert_text(&fragments[12], " ");
    assert_token(&fragments[13], "punctuation", "}");
}

#[rstest]
#[case("")]
#[case("plain words only")]
#[case("if (x) { return 1; } else { y(); }")]
#[case("/* comment */ \"str with \\\" escape\" 99")]
#[case("unterminated \"string and /* comment")]
#[case("多字节 if 文本 42")]
fn test_projection_reproduces_input(#[case] input: &str) {
    let fragments = run(input, &clike());
    assert_eq!(detokenize(&fragments), input);
}

#[rstest]
#[case("a1", 2)]
#[case("1a2b", 4)]
#[case("ab12cd", 3)]
fn test_fragment_counts(#[case] input: &str, #[case] expected: usize) {
    let fragments = run(input, &word_grammar());
    assert_eq!(fragments.len(), expected);
}
