/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

/// Whether `name` (without the leading colon) is a recognized pseudo-class,
/// ignoring ASCII case.
///
/// The vocabulary is the pseudo-classes of [Selectors Level 4]
/// (https://www.w3.org/TR/selectors-4/), both the tree-structural ones
/// (`:nth-child`, `:only-of-type`, ...) and the user-action and input
/// states (`:hover`, `:checked`, ...).
///
/// ```rust
/// use selector_tokenizer::is_pseudo_class;
///
/// assert!(is_pseudo_class("nth-child"));
/// assert!(is_pseudo_class("HOVER"));
/// assert!(!is_pseudo_class("before")); // pseudo-element, not pseudo-class
/// ```
pub fn is_pseudo_class(name: &str) -> bool {
    ascii_case_insensitive_phf_set! {
        fn recognized = {
            "active",
            "active-drop",
            "any-link",
            "blank",
            "checked",
            "current",
            "default",
            "disabled",
            "empty",
            "enabled",
            "first-child",
            "first-of-type",
            "focus",
            "future",
            "hover",
            "in-range",
            "indeterminate",
            "invalid",
            "invalid-drop",
            "lang",
            "last-child",
            "last-of-type",
            "link",
            "not",
            "nth-child",
            "nth-last-child",
            "nth-last-of-type",
            "nth-of-type",
            "only-child",
            "only-of-type",
            "optional",
            "out-of-range",
            "past",
            "placeholder-shown",
            "read-only",
            "read-write",
            "required",
            "root",
            "scope",
            "target",
            "valid",
            "valid-drop",
            "visited",
        }
    }
    recognized(name)
}
