//! Input classification — decides once per request whether the submitted string
//! is a page to fetch or job text to use as-is. Pure: no I/O.

use url::Url;

use crate::pipeline::error::PipelineError;

/// What the caller submitted, after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Url(Url),
    PlainText(String),
}

/// Classifies raw input as an `http`/`https` URL or plain text.
///
/// Only an input that parses as an absolute URL with an `http` or `https`
/// scheme and no embedded whitespace is a URL. A URL followed by pasted prose
/// is still prose.
pub fn classify(input: &str) -> Result<InputKind, PipelineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Ok(InputKind::PlainText(trimmed.to_string()));
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(InputKind::Url(url)),
        _ => Ok(InputKind::PlainText(trimmed.to_string())),
    }
}
