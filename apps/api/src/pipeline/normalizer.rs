//! Text normalization before the extraction prompt.
//!
//! Scraped pages are noisy and their structure carries no signal, so they are
//! reduced to plain alphanumeric words. Pasted text keeps its line breaks and
//! punctuation; only long whitespace runs are squeezed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

/// Default input budget for the extraction prompt, in approximate tokens.
pub const DEFAULT_MAX_TOKENS: usize = 25_000;
/// Characters per token used by the budget approximation.
pub const CHARS_PER_TOKEN: usize = 4;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*?>").expect("valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").expect("valid regex"));

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9 ]").expect("valid regex"));

static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static LONG_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{3,}").expect("valid regex"));

/// Aggressive cleanup for fetched page text.
///
/// Drops tags and URLs, keeps only ASCII letters, digits and spaces, then
/// squeezes space runs and trims. Line breaks become spaces so adjacent words
/// stay separate.
pub fn normalize_scraped(raw: &str) -> String {
    let text = TAG_RE.replace_all(raw, "");
    let text = URL_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = NON_WORD_RE.replace_all(&text, "");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Light cleanup for text pasted by the user.
///
/// Runs of three or more whitespace characters become one space; shorter runs
/// (a single line break, a blank line written as `\n\n`) survive.
pub fn normalize_direct(raw: &str) -> String {
    LONG_WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .into_owned()
}

/// Cuts `text` to at most `max_tokens * CHARS_PER_TOKEN` characters.
///
/// Counts Unicode scalar values, so a cut never lands inside a code point.
pub fn truncate(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            info!(
                "Text truncated from {} to {} characters",
                text.chars().count(),
                max_chars
            );
            text[..cut].to_string()
        }
        None => text.to_string(),
    }
}
