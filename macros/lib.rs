/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use proc_macro::TokenStream;
use quote::quote;

/// Input: string literal keys. Output: a `phf::Set` of those keys lowercased,
/// together with a `MAX_LENGTH` constant for the longest key.
///
/// Not public API. Use the `ascii_case_insensitive_phf_set!` macro of the
/// `selector-tokenizer` crate instead.
#[allow(non_snake_case)]
#[proc_macro]
pub fn selector_tokenizer_internal__phf_set(input: TokenStream) -> TokenStream {
    struct Input {
        keys: Vec<syn::LitStr>,
    }

    impl syn::parse::Parse for Input {
        fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
            let mut keys = Vec::new();
            while !input.is_empty() {
                keys.push(input.parse()?)
            }
            Ok(Input { keys })
        }
    }

    let Input { keys } = syn::parse_macro_input!(input);
    let max_length = keys
        .iter()
        .map(|key| key.value().len())
        .max()
        .expect("expected at least one key");
    let keys = keys
        .iter()
        .map(|key| syn::LitStr::new(&key.value().to_ascii_lowercase(), key.span()));
    quote!(
        pub(super) static SET: phf::Set<&'static str> = phf::phf_set! {
            #(
                #keys,
            )*
        };
        pub(super) const MAX_LENGTH: usize = #max_length;
    )
    .into()
}
