//! Inline language hints.
//!
//! A user can end their input with a separator and a language code to pin
//! the language instead of relying on detection:
//!
//! ```text
//! hello world>fr      -> "hello world", hint fr
//! guten Tag -> DE     -> "guten Tag",   hint de
//! mañana → es         -> "mañana",      hint es
//! ```
//!
//! Parsing is pure. What the hint is used for is up to the caller.

use crate::i18n::LanguageCode;
use regex::Regex;
use std::sync::OnceLock;

static HINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn hint_regex() -> &'static Regex {
    HINT_REGEX.get_or_init(|| {
        Regex::new(r"\s*(?:->|=>|>|→)\s*([A-Za-z]{2,3}(?:-[A-Za-z]{2,4})?)\s*$")
            .expect("valid hint regex")
    })
}

/// Input text with any inline hint removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub text: String,
    /// The hinted language, or `auto` when there was none
    pub hint: LanguageCode,
}

/// Split a trailing `<separator><code>` hint off `input`.
///
/// Only catalog codes count; `"see you>xx"` is returned untouched. When no
/// hint is found the input is returned as-is (not trimmed) with hint `auto`.
pub fn parse_language_hint(input: &str) -> ParsedInput {
    let unchanged = || ParsedInput {
        text: input.to_string(),
        hint: LanguageCode::auto(),
    };

    let Some(captures) = hint_regex().captures(input) else {
        return unchanged();
    };
    let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
        return unchanged();
    };
    let Ok(hint) = LanguageCode::parse(code.as_str()) else {
        return unchanged();
    };

    let remaining = input[..whole.start()].trim();
    if remaining == input {
        return unchanged();
    }

    ParsedInput {
        text: remaining.to_string(),
        hint,
    }
}
