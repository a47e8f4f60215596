/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![cfg_attr(feature = "bench", feature(test))]
#![deny(missing_docs)]

/*!

Tokenizer for [CSS selector](https://www.w3.org/TR/selectors-4/) strings.

A selector is broken into a flat sequence of [`Token`]s, each carrying its
kind, its half-open byte span in the source, and its text. The sequence
always ends in a zero-width EOF token, token spans tile the input exactly,
and every malformed input is rejected with a typed, position-annotated
[`TokenizeError`] rather than a partial stream.

```rust
use selector_tokenizer::{tokenize, TokenKind};

let tokens = tokenize("div:nth-child(2)").unwrap();
let values: Vec<&str> = tokens
    .iter()
    .filter(|token| token.kind != TokenKind::Eof)
    .map(|token| &*token.value)
    .collect();
assert_eq!(values, ["div", ":nth-child", "(", "2", ")"]);
```

Token values borrow from the input wherever they are an exact source slice,
so tokenizing a typical selector does not allocate.

*/

#[cfg(feature = "bench")]
extern crate test;

#[macro_use]
mod macros;

mod errors;
mod pseudo;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use crate::errors::{TokenizeError, TokenizeErrorKind};
pub use crate::pseudo::is_pseudo_class;
pub use crate::tokenizer::{tokenize, Token, TokenKind, TokenList, Tokenizer};

#[doc(hidden)]
pub use crate::macros::_selector_tokenizer_internal_to_lowercase;
#[doc(hidden)]
pub use phf;
#[doc(hidden)]
pub use selector_tokenizer_macros::selector_tokenizer_internal__phf_set;
