/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://www.w3.org/TR/selectors-4/#grammar

use crate::errors::{TokenizeError, TokenizeErrorKind};
use crate::pseudo::is_pseudo_class;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// The classification of a [`Token`].
///
/// This set is closed: selector sources only ever produce these eight kinds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TokenKind {
    /// The zero-width sentinel terminating every successful run.
    Eof,

    /// An element name, a name after `#` or `.`, an unquoted attribute
    /// value, or a namespace-qualified name such as `svg|circle`.
    Identifier,

    /// A quoted attribute value. The value excludes the quotes;
    /// the span includes them.
    StringLiteral,

    /// A run of white space. Significant in selectors: the
    /// [descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators).
    WhiteSpace,

    /// A structural character or attribute operator:
    /// `# . * > + ~ , [ ] ( ) = ~= |= ^= $= *=`.
    Punctuator,

    /// A [pseudo-class](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// such as `:hover`. The value is lowercased and keeps the colon.
    PseudoClass,

    /// A [pseudo-element](https://www.w3.org/TR/selectors-4/#pseudo-elements):
    /// `::after`, `::before`, `::first-line` or `::first-letter`.
    PseudoElement,

    /// A namespace prefix ending in `|` that was not followed by an
    /// identifier to merge with, e.g. `div|` before a space.
    Namespace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Eof => "EOF",
            TokenKind::Identifier => "Identifier",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::WhiteSpace => "WhiteSpace",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::PseudoClass => "PseudoClass",
            TokenKind::PseudoElement => "PseudoElement",
            TokenKind::Namespace => "Namespace",
        })
    }
}

/// One piece of a tokenized selector.
///
/// `start..end` is a half-open byte range into the source. For most kinds
/// `value` is exactly that slice; string literals strip their quotes, and
/// pseudo-class/pseudo-element values are the canonical lowercase spelling.
/// Escapes are consumed as units but not decoded: values keep the raw
/// `\`-sequences, decoding is a downstream concern.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Token<'a> {
    /// What was recognized.
    pub kind: TokenKind,

    /// Byte offset of the first byte of the span.
    pub start: usize,

    /// Byte offset one past the last byte of the span.
    pub end: usize,

    /// The text this token represents. Borrows from the source (or from a
    /// canonical constant) whenever possible.
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub value: Cow<'a, str>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, start: usize, end: usize, value: impl Into<Cow<'a, str>>) -> Self {
        Token {
            kind,
            start,
            end,
            value: value.into(),
        }
    }

    fn eof(position: usize) -> Self {
        Token::new(TokenKind::Eof, position, position, "")
    }
}

/// The token buffer of a successful run.
///
/// Typical selectors fit in the inline capacity, so tokenizing them does not
/// allocate for the buffer itself.
pub type TokenList<'a> = SmallVec<[Token<'a>; 16]>;

/// A single-pass tokenizer over one selector string.
///
/// Create it with [`Tokenizer::new`] and run it with [`Tokenizer::tokenize`];
/// the free [`tokenize`] function does both.
pub struct Tokenizer<'a> {
    input: &'a str,

    /// Byte offset into `input`, never a code point index.
    position: usize,

    tokens: TokenList<'a>,

    /// Open parentheses not yet closed. Must be back to zero at EOF.
    paren_depth: u32,
}

impl<'a> Tokenizer<'a> {
    /// Set up a tokenizer over `input`.
    ///
    /// Fails with [`TokenizeErrorKind::EmptySource`] when `input` is empty
    /// or all white space.
    pub fn new(input: &'a str) -> Result<Self, TokenizeError<'a>> {
        if input.chars().all(is_whitespace) {
            return Err(TokenizeError {
                kind: TokenizeErrorKind::EmptySource,
                position: 0,
            });
        }
        Ok(Tokenizer {
            input,
            position: 0,
            tokens: TokenList::new(),
            paren_depth: 0,
        })
    }

    /// Run the tokenizer to completion.
    ///
    /// On success the returned tokens tile the input and end in exactly one
    /// zero-width EOF token. A failed run reports the first violation;
    /// consuming `self` keeps partially filled buffers unreachable.
    pub fn tokenize(mut self) -> Result<TokenList<'a>, TokenizeError<'a>> {
        loop {
            let token = next_token(&mut self)?;
            let done = token.kind == TokenKind::Eof;
            self.push(token);
            if done {
                break;
            }
        }
        if self.paren_depth != 0 {
            return Err(self.error(TokenizeErrorKind::UnbalancedParentheses));
        }
        Ok(self.tokens)
    }

    fn push(&mut self, token: Token<'a>) {
        log::trace!("{:?}", token);
        self.tokens.push(token);
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.position += n
    }

    #[inline]
    fn slice(&self, range: Range<usize>) -> &'a str {
        &self.input[range]
    }

    // Assumes the cursor sits on a `\`.
    #[inline]
    fn starts_valid_escape(&self) -> bool {
        self.input[self.position + 1..]
            .chars()
            .next()
            .map_or(false, |c| !is_newline(c))
    }

    #[inline]
    fn starts_with_ignore_ascii_case(&self, needle: &str) -> bool {
        self.input.as_bytes()[self.position..]
            .get(..needle.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(needle.as_bytes()))
    }

    /// Pop the previous token back off the buffer if it is a namespace
    /// prefix waiting to merge with the identifier being scanned.
    fn take_namespace_prefix(&mut self) -> Option<Token<'a>> {
        match self.tokens.last() {
            Some(token) if token.kind == TokenKind::Namespace => self.tokens.pop(),
            _ => None,
        }
    }

    #[inline]
    fn error(&self, kind: TokenizeErrorKind<'a>) -> TokenizeError<'a> {
        TokenizeError {
            kind,
            position: self.position,
        }
    }
}

/// Tokenize a selector in one pass.
///
/// Convenience for [`Tokenizer::new`] followed by [`Tokenizer::tokenize`].
pub fn tokenize(input: &str) -> Result<TokenList<'_>, TokenizeError<'_>> {
    Tokenizer::new(input)?.tokenize()
}

#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

// The line-terminator class of the escape and string productions.
#[inline]
fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0C')
}

// Lowercase letter, `-`, or anything non-ASCII. Uppercase letters and `_`
// do not start identifiers.
#[inline]
fn is_identifier_start(c: char) -> bool {
    matches!(c, 'a'..='z' | '-') || !c.is_ascii()
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

// Names (after `#` or `.`, and inside attribute selectors) additionally
// admit `_`.
#[inline]
fn is_name_char(c: char) -> bool {
    is_identifier_char(c) || c == '_'
}

fn next_token<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<Token<'a>, TokenizeError<'a>> {
    let c = match tokenizer.peek() {
        Some(c) => c,
        None => return Ok(Token::eof(tokenizer.position)),
    };
    match c {
        c if is_whitespace(c) => Ok(consume_whitespace(tokenizer)),
        c if is_identifier_char(c) => Ok(consume_identifier(tokenizer)),
        '\\' if tokenizer.starts_valid_escape() => Ok(consume_identifier(tokenizer)),
        '"' | '\'' => consume_string(tokenizer, c),
        _ => consume_punctuator(tokenizer, c),
    }
}

fn consume_whitespace<'a>(tokenizer: &mut Tokenizer<'a>) -> Token<'a> {
    let start = tokenizer.position;
    while tokenizer.peek().map_or(false, is_whitespace) {
        tokenizer.advance(1);
    }
    let end = tokenizer.position;
    Token::new(
        TokenKind::WhiteSpace,
        start,
        end,
        tokenizer.slice(start..end),
    )
}

fn consume_identifier<'a>(tokenizer: &mut Tokenizer<'a>) -> Token<'a> {
    let Range { start, end } = consume_while(tokenizer, is_identifier_char);
    debug_assert!(start < end);
    match tokenizer.take_namespace_prefix() {
        Some(prefix) => merge_with_prefix(tokenizer, prefix, end),
        None => Token::new(
            TokenKind::Identifier,
            start,
            end,
            tokenizer.slice(start..end),
        ),
    }
}

/// Splice the identifier run that just ended at `end` onto a popped
/// namespace prefix: one Identifier token spanning both, `ns|div`.
fn merge_with_prefix<'a>(tokenizer: &Tokenizer<'a>, prefix: Token<'a>, end: usize) -> Token<'a> {
    let Token {
        start,
        end: prefix_end,
        value,
        ..
    } = prefix;
    let value = match value {
        // The prefix value is its exact source slice, so the merged value
        // can stay a borrow of the widened span.
        Cow::Borrowed(v) if v.len() == prefix_end - start => {
            Cow::Borrowed(tokenizer.slice(start..end))
        }
        value => {
            let mut value = value.into_owned();
            value.push_str(tokenizer.slice(prefix_end..end));
            Cow::Owned(value)
        }
    };
    Token {
        kind: TokenKind::Identifier,
        start,
        end,
        value,
    }
}

/// Consume a run of characters matching `includes`, taking each valid
/// escape as one unit of the run. The returned span may be empty.
fn consume_while(tokenizer: &mut Tokenizer<'_>, includes: fn(char) -> bool) -> Range<usize> {
    let start = tokenizer.position;
    while let Some(c) = tokenizer.peek() {
        if c == '\\' && tokenizer.starts_valid_escape() {
            tokenizer.advance(1);
            consume_escape(tokenizer);
        } else if includes(c) {
            tokenizer.advance(c.len_utf8());
        } else {
            break;
        }
    }
    start..tokenizer.position
}

/// Consume the body of an escape, after the `\`: up to six hex digits plus
/// one unit of trailing white space, or a single literal character.
/// Escapes are not decoded; callers keep the raw text.
fn consume_escape(tokenizer: &mut Tokenizer<'_>) {
    let hex_start = tokenizer.position;
    while tokenizer.position - hex_start < 6
        && tokenizer.peek().map_or(false, |c| c.is_ascii_hexdigit())
    {
        tokenizer.advance(1);
    }
    if tokenizer.position == hex_start {
        // Not a hex escape: the backslash cancels one literal character.
        if let Some(c) = tokenizer.peek() {
            tokenizer.advance(c.len_utf8());
        }
        return;
    }
    match tokenizer.peek() {
        // A hex escape swallows one unit of white space; \r\n is one unit.
        Some('\r') => {
            tokenizer.advance(1);
            if tokenizer.peek() == Some('\n') {
                tokenizer.advance(1);
            }
        }
        Some(c) if is_whitespace(c) => tokenizer.advance(1),
        _ => {}
    }
}

fn consume_string<'a>(
    tokenizer: &mut Tokenizer<'a>,
    quote: char,
) -> Result<Token<'a>, TokenizeError<'a>> {
    let start = tokenizer.position;
    tokenizer.advance(1);
    loop {
        match tokenizer.peek() {
            Some(c) if c == quote => {
                tokenizer.advance(1);
                let end = tokenizer.position;
                return Ok(Token::new(
                    TokenKind::StringLiteral,
                    start,
                    end,
                    tokenizer.slice(start + 1..end - 1),
                ));
            }
            Some('\\') if tokenizer.starts_valid_escape() => {
                tokenizer.advance(1);
                consume_escape(tokenizer);
            }
            Some(c) if c != '\\' && !is_newline(c) => tokenizer.advance(c.len_utf8()),
            // EOF, a raw line terminator, or a broken escape.
            _ => return Err(tokenizer.error(TokenizeErrorKind::UnterminatedStringLiteral)),
        }
    }
}

fn consume_punctuator<'a>(
    tokenizer: &mut Tokenizer<'a>,
    c: char,
) -> Result<Token<'a>, TokenizeError<'a>> {
    match c {
        '#' | '.' => {
            let marker = consume_single_punctuator(tokenizer);
            tokenizer.push(marker);
            consume_name(tokenizer, TokenizeErrorKind::InvalidIdentifierChar)
        }
        '*' | '>' | '+' | '~' | ',' => Ok(consume_single_punctuator(tokenizer)),
        '[' => {
            let bracket = consume_single_punctuator(tokenizer);
            tokenizer.push(bracket);
            consume_attribute(tokenizer)
        }
        ':' => consume_pseudo(tokenizer),
        '|' => Ok(consume_namespace(tokenizer)),
        '(' => {
            tokenizer.paren_depth += 1;
            Ok(consume_single_punctuator(tokenizer))
        }
        ')' => {
            if tokenizer.paren_depth == 0 {
                return Err(tokenizer.error(TokenizeErrorKind::UnbalancedParentheses));
            }
            tokenizer.paren_depth -= 1;
            Ok(consume_single_punctuator(tokenizer))
        }
        _ => Err(tokenizer.error(TokenizeErrorKind::UnrecognizedCharacter(c))),
    }
}

// All punctuators are single-byte ASCII.
fn consume_single_punctuator<'a>(tokenizer: &mut Tokenizer<'a>) -> Token<'a> {
    let start = tokenizer.position;
    tokenizer.advance(1);
    let end = tokenizer.position;
    Token::new(
        TokenKind::Punctuator,
        start,
        end,
        tokenizer.slice(start..end),
    )
}

/// Consume a required name run (`is_name_char`), failing with `missing`
/// when the run is empty.
fn consume_name<'a>(
    tokenizer: &mut Tokenizer<'a>,
    missing: TokenizeErrorKind<'a>,
) -> Result<Token<'a>, TokenizeError<'a>> {
    let Range { start, end } = consume_while(tokenizer, is_name_char);
    if start == end {
        return Err(tokenizer.error(missing));
    }
    Ok(Token::new(
        TokenKind::Identifier,
        start,
        end,
        tokenizer.slice(start..end),
    ))
}

// https://www.w3.org/TR/selectors-4/#attribute-selectors
//
// Called after the `[` was pushed; returns the closing `]` token, with
// everything in between pushed along the way.
fn consume_attribute<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<Token<'a>, TokenizeError<'a>> {
    let name = consume_name(tokenizer, TokenizeErrorKind::MissingAttributeName)?;
    tokenizer.push(name);

    match tokenizer.peek() {
        Some('=') => {
            let operator = consume_single_punctuator(tokenizer);
            tokenizer.push(operator);
        }
        Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
            let start = tokenizer.position;
            tokenizer.advance(1);
            if tokenizer.peek() != Some('=') {
                return Err(tokenizer.error(TokenizeErrorKind::InvalidOperator(op)));
            }
            tokenizer.advance(1);
            let end = tokenizer.position;
            let operator = Token::new(
                TokenKind::Punctuator,
                start,
                end,
                tokenizer.slice(start..end),
            );
            tokenizer.push(operator);
        }
        // Bare attribute presence, e.g. `[href]`.
        Some(']') => return Ok(consume_single_punctuator(tokenizer)),
        None => return Err(tokenizer.error(TokenizeErrorKind::MissingClosingBracket)),
        Some(_) => {}
    }

    let value = match tokenizer.peek() {
        Some(quote @ ('"' | '\'')) => consume_string(tokenizer, quote)?,
        _ => consume_name(tokenizer, TokenizeErrorKind::InvalidIdentifierChar)?,
    };
    tokenizer.push(value);

    // Optional white space and case-insensitivity flag, `[type=text i]`.
    if tokenizer.peek().map_or(false, is_whitespace) {
        let space = consume_whitespace(tokenizer);
        tokenizer.push(space);
    }
    if tokenizer.peek().map_or(false, is_name_char) {
        let flag = consume_while(tokenizer, is_name_char);
        if tokenizer.slice(flag.clone()) != "i" {
            return Err(TokenizeError {
                kind: TokenizeErrorKind::MissingClosingBracket,
                position: flag.start,
            });
        }
        let flag = Token::new(
            TokenKind::Identifier,
            flag.start,
            flag.end,
            tokenizer.slice(flag),
        );
        tokenizer.push(flag);
        if tokenizer.peek().map_or(false, is_whitespace) {
            let space = consume_whitespace(tokenizer);
            tokenizer.push(space);
        }
    }

    match tokenizer.peek() {
        Some(']') => Ok(consume_single_punctuator(tokenizer)),
        _ => Err(tokenizer.error(TokenizeErrorKind::MissingClosingBracket)),
    }
}

fn consume_pseudo<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<Token<'a>, TokenizeError<'a>> {
    let start = tokenizer.position;
    tokenizer.advance(1);
    if tokenizer.peek() == Some(':') {
        tokenizer.advance(1);
        consume_pseudo_element(tokenizer, start)
    } else {
        consume_pseudo_class(tokenizer, start)
    }
}

// https://www.w3.org/TR/selectors-4/#pseudo-elements
//
// Keywords match by prefix with fixed lengths: `::afterwards` is `::after`
// followed by the identifier `wards`.
fn consume_pseudo_element<'a>(
    tokenizer: &mut Tokenizer<'a>,
    start: usize,
) -> Result<Token<'a>, TokenizeError<'a>> {
    let matched = match tokenizer.peek().map(|c| c.to_ascii_lowercase()) {
        Some('a') if tokenizer.starts_with_ignore_ascii_case("after") => "::after",
        Some('b') if tokenizer.starts_with_ignore_ascii_case("before") => "::before",
        Some('f') if tokenizer.starts_with_ignore_ascii_case("first-line") => "::first-line",
        Some('f') if tokenizer.starts_with_ignore_ascii_case("first-letter") => "::first-letter",
        _ => {
            return Err(TokenizeError {
                kind: TokenizeErrorKind::InvalidPseudoElement,
                position: start,
            })
        }
    };
    tokenizer.advance(matched.len() - "::".len());
    Ok(Token::new(
        TokenKind::PseudoElement,
        start,
        tokenizer.position,
        matched,
    ))
}

// https://www.w3.org/TR/selectors-4/#pseudo-classes
fn consume_pseudo_class<'a>(
    tokenizer: &mut Tokenizer<'a>,
    start: usize,
) -> Result<Token<'a>, TokenizeError<'a>> {
    let name_start = tokenizer.position;
    while tokenizer
        .peek()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '-')
    {
        tokenizer.advance(1);
    }
    let end = tokenizer.position;
    let name = tokenizer.slice(name_start..end);
    if !is_pseudo_class(name) {
        return Err(TokenizeError {
            kind: TokenizeErrorKind::InvalidPseudoClassName(name),
            position: start,
        });
    }
    let value = if name.bytes().any(|byte| byte.is_ascii_uppercase()) {
        let mut value = String::with_capacity(end - start);
        value.push(':');
        value.push_str(&name.to_ascii_lowercase());
        Cow::Owned(value)
    } else {
        Cow::Borrowed(tokenizer.slice(start..end))
    };
    Ok(Token {
        kind: TokenKind::PseudoClass,
        start,
        end,
        value,
    })
}

/// Turn the `|` and the token emitted before it into one Namespace token.
///
/// Any previous token can serve as the prefix; with none, the prefix is
/// empty (`|div`). An identifier scanned right after finds the Namespace
/// token and merges with it in turn.
fn consume_namespace<'a>(tokenizer: &mut Tokenizer<'a>) -> Token<'a> {
    let pipe = tokenizer.position;
    tokenizer.advance(1);
    let end = tokenizer.position;
    let prefix = tokenizer
        .tokens
        .pop()
        .unwrap_or_else(|| Token::new(TokenKind::Namespace, pipe, pipe, ""));
    let Token { start, value, .. } = prefix;
    let value = match value {
        Cow::Borrowed(v) if v.len() == pipe - start => Cow::Borrowed(tokenizer.slice(start..end)),
        value => {
            let mut value = value.into_owned();
            value.push('|');
            Cow::Owned(value)
        }
    };
    Token {
        kind: TokenKind::Namespace,
        start,
        end,
        value,
    }
}
