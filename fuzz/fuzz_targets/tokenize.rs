#![no_main]

use selector_tokenizer::{tokenize, TokenKind};

fn fuzz(data: &str) {
    let tokens = match tokenize(data) {
        Ok(tokens) => tokens,
        Err(_) => return,
    };
    // Accepted input must produce spans that tile it exactly and end in a
    // single zero-width EOF token.
    let mut expected_start = 0;
    for token in &tokens {
        assert_eq!(token.start, expected_start);
        assert!(token.end >= token.start);
        expected_start = token.end;
    }
    assert_eq!(expected_start, data.len());
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
}

libfuzzer_sys::fuzz_target!(|data: &str| {
    fuzz(data);
});
