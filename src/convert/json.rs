//! Structured-output post-processing.
//!
//! The agent runtime has no native JSON mode and tends to wrap JSON answers
//! in markdown code fences.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[\w+-]*[ \t]*\r?\n?(.*?)\r?\n?```$").expect("valid code fence regex")
});

/// Strip a surrounding markdown code fence (with optional language tag) and
/// trim the result. Text without a fence is returned unchanged.
pub fn strip_markdown_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    match CODE_FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => text.to_string(),
    }
}
