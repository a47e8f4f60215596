/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde_json::{json, Value};
use std::borrow::Cow;

#[cfg(feature = "bench")]
use test::Bencher;

use crate::{
    is_pseudo_class, tokenize, TokenKind, TokenizeError, TokenizeErrorKind, Tokenizer,
};

fn almost_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| almost_equals(a, b))
        }
        _ => a == b,
    }
}

fn assert_json_eq(results: Value, expected: Value, message: &str) {
    if !almost_equals(&results, &expected) {
        let results = serde_json::to_string_pretty(&results).unwrap();
        let expected = serde_json::to_string_pretty(&expected).unwrap();
        let diff = difference::Changeset::new(&results, &expected, "\n");
        panic!("{}\n{}", message, diff);
    }
}

/// The fixture files are flat arrays of alternating input strings and
/// expected results.
fn run_json_tests<F: Fn(&str) -> Value>(json_data: &str, run: F) {
    let items = match serde_json::from_str(json_data) {
        Ok(Value::Array(items)) => items,
        other => panic!("Invalid JSON: {:?}", other),
    };
    assert_eq!(items.len() % 2, 0, "expected input/result pairs");
    let mut input = None;
    for item in items {
        match (input.take(), item) {
            (None, Value::String(string)) => input = Some(string),
            (None, other) => panic!("unexpected fixture input: {:?}", other),
            (Some(string), expected) => {
                let results = run(&string);
                assert_json_eq(results, expected, &string);
            }
        }
    }
}

/// Token values in source order, EOF omitted; errors as `["error", offset]`.
fn token_values(input: &str) -> Value {
    match tokenize(input) {
        Ok(tokens) => Value::Array(
            tokens
                .iter()
                .filter(|token| token.kind != TokenKind::Eof)
                .map(|token| Value::String(token.value.to_string()))
                .collect(),
        ),
        Err(TokenizeError { position, .. }) => json!(["error", position]),
    }
}

/// Full token records as `[kind, value, start, end]`, EOF included.
fn token_details(input: &str) -> Value {
    match tokenize(input) {
        Ok(tokens) => Value::Array(
            tokens
                .iter()
                .map(|token| json!([token.kind.to_string(), &*token.value, token.start, token.end]))
                .collect(),
        ),
        Err(TokenizeError { position, .. }) => json!(["error", position]),
    }
}

/// `"ok"` for well-formed input, `[kind, offset]` otherwise.
fn error_details(input: &str) -> Value {
    match tokenize(input) {
        Ok(_) => json!("ok"),
        Err(TokenizeError { kind, position }) => json!([error_name(&kind), position]),
    }
}

fn error_name(kind: &TokenizeErrorKind<'_>) -> &'static str {
    match kind {
        TokenizeErrorKind::EmptySource => "EmptySource",
        TokenizeErrorKind::InvalidIdentifierChar => "InvalidIdentifierChar",
        TokenizeErrorKind::UnterminatedStringLiteral => "UnterminatedStringLiteral",
        TokenizeErrorKind::MissingAttributeName => "MissingAttributeName",
        TokenizeErrorKind::InvalidOperator(_) => "InvalidOperator",
        TokenizeErrorKind::MissingClosingBracket => "MissingClosingBracket",
        TokenizeErrorKind::InvalidPseudoElement => "InvalidPseudoElement",
        TokenizeErrorKind::InvalidPseudoClassName(_) => "InvalidPseudoClassName",
        TokenizeErrorKind::UnbalancedParentheses => "UnbalancedParentheses",
        TokenizeErrorKind::UnrecognizedCharacter(_) => "UnrecognizedCharacter",
    }
}

#[test]
fn token_value_fixtures() {
    run_json_tests(
        include_str!("selector-parsing-tests/tokens.json"),
        token_values,
    );
}

#[test]
fn token_detail_fixtures() {
    run_json_tests(
        include_str!("selector-parsing-tests/token_details.json"),
        token_details,
    );
}

#[test]
fn error_fixtures() {
    run_json_tests(
        include_str!("selector-parsing-tests/errors.json"),
        error_details,
    );
}

const WELL_FORMED: &[&str] = &[
    "*",
    "div",
    "#abc",
    ".top",
    ".top.left",
    "div #abc",
    "header.top",
    "div a span",
    "div > p",
    "div + p",
    "p ~ span",
    "h1, h2",
    "a[href]",
    "[lang]",
    "span[foo=\"bar\"]",
    "span[foo='bar']",
    "a[href=en]",
    "article[foo^=\"hello\"]",
    "p[foo$=\"hey\"]",
    "p[foo*=\"ell\"]",
    "a[hreflang|=\"en\"]",
    "h1[foo~=\"bar\"]",
    "input[type=\"text\" i]",
    "input[type=text i]",
    "[data-state=\"open\"i]",
    "ns|div",
    "*|div",
    "|div",
    "div| p",
    ":hover",
    ":nth-child(2)",
    "li:nth-child(2n+1)",
    ":not(.top)",
    "div::first-letter",
    "p::first-line",
    "a::afterwards",
    "#_private",
    ".with_underscore",
    "\\64 iv",
    "\\64\r\niv",
    "\\E9 x",
    "\\!x",
    "café",
    "  div  ",
];

#[test]
fn spans_tile_the_input() {
    for input in WELL_FORMED {
        let tokens = tokenize(input).unwrap();
        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(
                token.start, expected_start,
                "gap before {:?} in {:?}",
                token, input
            );
            assert!(token.end >= token.start);
            expected_start = token.end;
        }
        assert_eq!(expected_start, input.len(), "tokens do not cover {:?}", input);
    }
}

#[test]
fn spans_match_values() {
    for input in WELL_FORMED {
        let tokens = tokenize(input).unwrap();
        for token in &tokens {
            match token.kind {
                // Documented exceptions: quotes stripped, canonical casing.
                TokenKind::StringLiteral | TokenKind::PseudoClass | TokenKind::PseudoElement => {}
                _ => assert_eq!(
                    &input[token.start..token.end],
                    &*token.value,
                    "span/value mismatch in {:?}",
                    input
                ),
            }
        }
    }
}

#[test]
fn ends_with_a_single_eof_token() {
    for input in WELL_FORMED {
        let tokens = tokenize(input).unwrap();
        let eof_count = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Eof)
            .count();
        assert_eq!(eof_count, 1, "in {:?}", input);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Eof);
        assert_eq!((last.start, last.end), (input.len(), input.len()));
        assert_eq!(last.value, "");
    }
}

#[test]
fn plain_values_borrow_from_the_input() {
    let tokens = tokenize("ns|div > p[foo=\"bar\"]").unwrap();
    for token in &tokens {
        assert!(
            matches!(token.value, Cow::Borrowed(_)),
            "{:?} should borrow",
            token
        );
    }

    // Lowercasing is the one case that has to allocate.
    let tokens = tokenize(":HOVER").unwrap();
    assert!(matches!(tokens[0].value, Cow::Owned(_)));
    assert_eq!(tokens[0].value, ":hover");
}

#[test]
fn empty_source_is_rejected() {
    for input in &["", " ", "\t\n  "] {
        let error = Tokenizer::new(input).err().unwrap();
        assert_eq!(error.kind, TokenizeErrorKind::EmptySource);
        assert_eq!(error.position, 0);
    }
}

#[test]
fn error_kinds_and_positions() {
    let cases: &[(&str, TokenizeErrorKind<'_>, usize)] = &[
        ("div)", TokenizeErrorKind::UnbalancedParentheses, 3),
        (":not(.x", TokenizeErrorKind::UnbalancedParentheses, 7),
        ("\"abc", TokenizeErrorKind::UnterminatedStringLiteral, 4),
        ("'ab\nc'", TokenizeErrorKind::UnterminatedStringLiteral, 3),
        ("[=x]", TokenizeErrorKind::MissingAttributeName, 1),
        ("[foo", TokenizeErrorKind::MissingClosingBracket, 4),
        ("[foo=\"bar\"", TokenizeErrorKind::MissingClosingBracket, 10),
        ("[a=\"b\" x]", TokenizeErrorKind::MissingClosingBracket, 7),
        ("[foo~bar]", TokenizeErrorKind::InvalidOperator('~'), 5),
        ("[foo=]", TokenizeErrorKind::InvalidIdentifierChar, 5),
        ("#", TokenizeErrorKind::InvalidIdentifierChar, 1),
        (".()", TokenizeErrorKind::InvalidIdentifierChar, 1),
        ("div::hover", TokenizeErrorKind::InvalidPseudoElement, 3),
        (
            ":frst-child",
            TokenizeErrorKind::InvalidPseudoClassName("frst-child"),
            0,
        ),
        (":before", TokenizeErrorKind::InvalidPseudoClassName("before"), 0),
        ("DIV", TokenizeErrorKind::UnrecognizedCharacter('D'), 0),
        ("a=b", TokenizeErrorKind::UnrecognizedCharacter('='), 1),
        ("a\\\nb", TokenizeErrorKind::UnrecognizedCharacter('\\'), 1),
    ];
    for (input, kind, position) in cases {
        let error = tokenize(input).err().unwrap();
        assert_eq!(error.kind, *kind, "for {:?}", input);
        assert_eq!(error.position, *position, "for {:?}", input);
    }
}

#[test]
fn error_messages() {
    let error = tokenize(":shiny").err().unwrap();
    assert_eq!(
        error.to_string(),
        "`shiny` is not a valid pseudo-class name at offset 0"
    );
}

#[test]
fn escapes_consume_as_single_units() {
    // \r\n after the hex digits is one unit of trailing white space.
    let tokens = tokenize("\\64\r\niv").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "\\64\r\niv");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 7));
    assert_eq!(tokens[1].kind, TokenKind::Eof);

    // Hex digits match case-insensitively.
    let tokens = tokenize("\\E9 x").unwrap();
    assert_eq!(tokens[0].value, "\\E9 x");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 5));

    // A non-hex, non-newline character after the backslash is escaped
    // literally.
    let tokens = tokenize("\\!x").unwrap();
    assert_eq!(tokens[0].value, "\\!x");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 3));

    // A backslash at end of input is not a valid escape, so the string
    // is unterminated at the backslash.
    let error = tokenize("\"ab\\").err().unwrap();
    assert_eq!(error.kind, TokenizeErrorKind::UnterminatedStringLiteral);
    assert_eq!(error.position, 3);
}

#[test]
fn namespace_prefixes_merge_into_one_token() {
    let tokens = tokenize("ns|div").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "ns|div");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 6));

    let tokens = tokenize("*|div").unwrap();
    assert_eq!(tokens[0].value, "*|div");

    let tokens = tokenize("|div").unwrap();
    assert_eq!(tokens[0].value, "|div");

    // A prefix with nothing to merge into stays a Namespace token.
    let tokens = tokenize("div| p").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Namespace);
    assert_eq!(tokens[0].value, "div|");
    assert_eq!(tokens[2].value, "p");
}

#[test]
fn pseudo_elements_match_by_prefix() {
    let tokens = tokenize("a::afterwards").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::PseudoElement);
    assert_eq!(tokens[1].value, "::after");
    assert_eq!((tokens[1].start, tokens[1].end), (1, 8));
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "wards");
}

#[test]
fn pseudo_values_are_lowercased() {
    let tokens = tokenize("p::FIRST-LINE").unwrap();
    assert_eq!(tokens[1].value, "::first-line");
    assert_eq!((tokens[1].start, tokens[1].end), (1, 13));

    let tokens = tokenize(":nTh-Child(2)").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::PseudoClass);
    assert_eq!(tokens[0].value, ":nth-child");
    assert_eq!((tokens[0].start, tokens[0].end), (0, 10));
}

#[test]
fn pseudo_class_vocabulary() {
    assert!(is_pseudo_class("not"));
    assert!(is_pseudo_class("nth-last-of-type"));
    assert!(is_pseudo_class("placeholder-shown"));
    assert!(is_pseudo_class("HOVER"));
    assert!(is_pseudo_class("First-Child"));

    assert!(!is_pseudo_class(""));
    assert!(!is_pseudo_class("before"));
    assert!(!is_pseudo_class("nthchild"));
    // One byte longer than the longest member.
    assert!(!is_pseudo_class("placeholder-shownn"));
}

#[cfg(feature = "serde")]
#[test]
fn token_serialization() {
    let tokens = tokenize("div").unwrap();
    let json = serde_json::to_string(&tokens[0]).unwrap();
    let back: crate::Token<'_> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tokens[0]);
}

#[cfg(feature = "bench")]
#[bench]
fn pseudo_class_lookup(b: &mut Bencher) {
    b.iter(|| {
        assert!(is_pseudo_class("nth-last-of-type"));
        assert!(!is_pseudo_class("nth-last-of-typo"));
    })
}

#[cfg(feature = "bench")]
#[bench]
fn tokenize_compound_selector(b: &mut Bencher) {
    let input = "main > ns|article[data-state=\"open\" i]:nth-child(2n+1)::first-line";
    b.iter(|| tokenize(input).unwrap().len())
}
