//! Post text cleanup.

use std::sync::LazyLock;

use regex::Regex;

/// A line consisting solely of a channel handle, e.g. `@nexta_live`.
static HANDLE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[\w_]+$").expect("valid handle line regex"));

static NEWLINE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline run regex"));

/// Normalize preview text.
///
/// 1. Trim surrounding whitespace.
/// 2. Drop the last line when it is a bare `@handle` (channel attribution),
///    then trim again.
/// 3. Collapse runs of three or more newlines to exactly two.
#[must_use]
pub fn clean_post_text(raw: &str) -> String {
    let text = raw.trim();
    let last_line_start = text.rfind('\n').map_or(0, |i| i + 1);
    let last_line = &text[last_line_start..];

    let body = if HANDLE_LINE_RE.is_match(last_line.trim()) {
        text[..last_line_start].trim()
    } else {
        text
    };

    NEWLINE_RUN_RE.replace_all(body, "\n\n").into_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
