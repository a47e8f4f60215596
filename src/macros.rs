/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

/// Define a function that checks whether a string is in a set,
/// ignoring ASCII case in the input.
///
/// The set is compiled into a [`phf`](https://crates.io/crates/phf) static,
/// so membership tests do not allocate.
///
/// ```rust
/// selector_tokenizer::ascii_case_insensitive_phf_set! {
///     fn is_quirky_tag = { "marquee", "blink" }
/// }
///
/// assert!(is_quirky_tag("MARQUEE"));
/// assert!(!is_quirky_tag("div"));
/// ```
#[macro_export]
macro_rules! ascii_case_insensitive_phf_set {
    ($vis: vis fn $name: ident = { $( $key: tt ),+ $(,)? }) => {
        $vis fn $name(input: &str) -> bool {
            #[allow(non_snake_case)]
            mod selector_tokenizer_internal {
                use $crate::phf;
                $crate::selector_tokenizer_internal__phf_set! { $( $key )+ }
            }
            $crate::_selector_tokenizer_internal_to_lowercase!(
                input, selector_tokenizer_internal::MAX_LENGTH => lowercase
            );
            lowercase.map_or(false, |s| selector_tokenizer_internal::SET.contains(s))
        }
    };
}

/// Implementation detail of `ascii_case_insensitive_phf_set!`.
///
/// **This macro is not part of the public API. It can change or be removed
/// between any versions.**
///
/// Define a local variable `$output` of type `Option<&str>`,
/// backed by a stack buffer of `$BUFFER_SIZE` bytes.
#[macro_export]
#[doc(hidden)]
macro_rules! _selector_tokenizer_internal_to_lowercase {
    ($input: expr, $BUFFER_SIZE: expr => $output: ident) => {
        let mut buffer = [0u8; $BUFFER_SIZE];
        let $output = $crate::_selector_tokenizer_internal_to_lowercase(&mut buffer, $input);
    };
}

/// Implementation detail of `ascii_case_insensitive_phf_set!`.
///
/// **This function is not part of the public API. It can change or be removed
/// between any versions.**
///
/// Return `input`, lowercased into `buffer` if needed,
/// or `None` if `input` is longer than `buffer`.
#[doc(hidden)]
pub fn _selector_tokenizer_internal_to_lowercase<'a>(
    buffer: &'a mut [u8],
    input: &'a str,
) -> Option<&'a str> {
    let buffer = buffer.get_mut(..input.len())?;
    let first_uppercase = match input.bytes().position(|byte| byte.is_ascii_uppercase()) {
        Some(first) => first,
        None => return Some(input),
    };
    buffer.copy_from_slice(input.as_bytes());
    buffer[first_uppercase..].make_ascii_lowercase();
    // A copy of well-formed UTF-8 with some ASCII bytes lowercased is still
    // well-formed UTF-8.
    std::str::from_utf8(buffer).ok()
}
