//! Inline `@(word:X)` annotations used by the live-room feed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\(word:([^)]+)\)").expect("word token regex is valid"));

/// Replace every `@(word:X)` token with its bare content `X`.
///
/// Borrows the input unchanged when it contains no tokens.
pub fn strip_word_tokens(text: &str) -> Cow<'_, str> {
    WORD_TOKEN.replace_all(text, "$1")
}
