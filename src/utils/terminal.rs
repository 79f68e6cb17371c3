//! Terminal output sanitization
//!
//! Captured CLI output is untrusted: model names, tool names and session ids printed by
//! the `stats` command come straight from the log. Escape sequences in them could move
//! the cursor or recolor the terminal, so anything taken from a log passes through
//! [`sanitize`] before it is printed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences (`ESC [ params intermediates final`) and two-byte escapes
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|[@-Z\\-_])").expect("escape sequence regex")
});

/// Remove escape sequences and control characters other than tab and newline
///
/// # Examples
///
/// ```
/// use agent_log_timeline::utils::terminal::sanitize;
///
/// assert_eq!(sanitize("\x1b[31mgpt-5\x1b[0m"), "gpt-5");
/// assert_eq!(sanitize("plain"), "plain");
/// ```
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let needs_work = text.chars().any(|ch| ch.is_control() && ch != '\t' && ch != '\n');
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let without_escapes = ESCAPE_SEQUENCE.replace_all(text, "");
    Cow::Owned(
        without_escapes.chars().filter(|&ch| !ch.is_control() || ch == '\t' || ch == '\n').collect(),
    )
}

/// Sanitize and cut to at most `max_chars` characters, marking the cut with `…`
pub fn sanitize_truncated(text: &str, max_chars: usize) -> String {
    let clean = sanitize(text);
    if clean.chars().count() <= max_chars {
        return clean.into_owned();
    }
    let mut cut: String = clean.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
