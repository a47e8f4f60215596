/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use thiserror::Error;

/// An error encountered while tokenizing a selector, together with
/// the byte offset in the source where it was detected.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{kind} at offset {position}")]
pub struct TokenizeError<'i> {
    /// What went wrong.
    pub kind: TokenizeErrorKind<'i>,
    /// Byte offset in the source where the problem was detected.
    pub position: usize,
}

/// The reason tokenization failed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TokenizeErrorKind<'i> {
    /// The source was empty, or contained only white space.
    #[error("source cannot be empty")]
    EmptySource,

    /// A name was required (after `#`, `.`, or an attribute operator)
    /// but no name character followed.
    #[error("expected at least one name character")]
    InvalidIdentifierChar,

    /// A string literal ran into a newline or the end of the source
    /// before its closing quote.
    #[error("unterminated string literal")]
    UnterminatedStringLiteral,

    /// An attribute selector `[...]` did not start with an attribute name.
    #[error("expected an attribute name")]
    MissingAttributeName,

    /// An operator character inside an attribute selector was not
    /// followed by `=`.
    #[error("operator `{0}` needs an equal sign")]
    InvalidOperator(char),

    /// An attribute selector was not closed with `]`.
    #[error("expected `]` to close the attribute selector")]
    MissingClosingBracket,

    /// `::` was not followed by a known pseudo-element name.
    #[error("expected a pseudo-element: ::after, ::before, ::first-line or ::first-letter")]
    InvalidPseudoElement,

    /// `:` was followed by a name outside the pseudo-class vocabulary.
    /// Carries the offending name as written in the source.
    #[error("`{0}` is not a valid pseudo-class name")]
    InvalidPseudoClassName(&'i str),

    /// A `)` had no matching `(`, or a `(` was never closed.
    #[error("parentheses are not balanced")]
    UnbalancedParentheses,

    /// A character that cannot start any token.
    #[error("unrecognized character `{0}`")]
    UnrecognizedCharacter(char),
}
