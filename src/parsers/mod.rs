//! Log parsers for captured agent CLI output
//!
//! # Error Handling Strategy
//!
//! Parsing follows a **never fail** approach: every entry point returns a value, and the
//! worst outcome for unrecognized input is an empty session list.
//!
//! - **Format rejection**: Each parser decides cheaply whether the input is its format
//!   (first-line JSON envelope, or a session banner) and returns `None` if not. The
//!   dispatcher then tries the next parser.
//!
//! - **Line-level malformation**: The JSON parser skips lines that fail to decode; the
//!   marker-text parser keeps them as [`LogEvent::Unknown`](crate::models::LogEvent).
//!
//! - **Missing correlation**: Calls and results are emitted independently. Consumers pair
//!   them by adjacency.
//!
//! - **Duplicate content**: A JSON `result` whose text repeats the preceding assistant
//!   turn verbatim is emitted without that text.
//!
//! Diagnostics for skipped or rejected input go to the `log` facade at debug level.

pub mod deserializers;
pub mod json_stream;
pub mod marker_text;
pub mod markers;
pub mod options;
pub mod tool_args;

use serde::Serialize;

pub use options::{DEFAULT_TOOL_RESULT_CHAR_LIMIT, LogFormat, ParseOptions};
pub use tool_args::interpret_tool_args;

use crate::models::ConversationSession;

/// Sessions produced by a parse run and the format that produced them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// `None` when no parser accepted the input
    pub format: Option<LogFormat>,
    pub sessions: Vec<ConversationSession>,
}

/// Parse captured CLI output with default options
///
/// Tries the JSON-Lines parser first, then the marker-text parser. Input neither accepts
/// yields an empty list.
///
/// # Examples
///
/// ```
/// use agent_log_timeline::parse;
/// use agent_log_timeline::models::LogEvent;
///
/// let text = r#"{"type":"system","subtype":"init","session_id":"abc"}
/// {"type":"user","message":{"content":[{"type":"text","text":"hi"}]}}"#;
///
/// let sessions = parse(text);
/// assert_eq!(sessions.len(), 1);
/// assert_eq!(sessions[0].meta.context_id.as_deref(), Some("abc"));
/// assert_eq!(sessions[0].events[1], LogEvent::User { text: "hi".to_string() });
///
/// assert!(parse("nothing to see here").is_empty());
/// ```
pub fn parse(text: &str) -> Vec<ConversationSession> {
    parse_with(text, &ParseOptions::default()).sessions
}

/// Parse captured CLI output, reporting which format matched
pub fn parse_with(text: &str, options: &ParseOptions) -> ParseOutcome {
    let candidates = match options.format {
        Some(format) => vec![format],
        None => vec![LogFormat::JsonStream, LogFormat::MarkerText],
    };

    for format in candidates {
        let sessions = match format {
            LogFormat::JsonStream => json_stream::try_parse(text, options),
            LogFormat::MarkerText => marker_text::try_parse(text),
        };
        if let Some(sessions) = sessions
            && !sessions.is_empty()
        {
            log::debug!("parsed {} session(s) as {}", sessions.len(), format);
            return ParseOutcome { format: Some(format), sessions };
        }
    }

    log::debug!("no parser accepted input ({} bytes)", text.len());
    ParseOutcome::default()
}

/// Which format, if any, the input parses as
pub fn detect_format(text: &str) -> Option<LogFormat> {
    parse_with(text, &ParseOptions::default()).format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogEvent;

    const JSON_LOG: &str = r#"{"type":"system","subtype":"init","session_id":"abc"}
{"type":"user","message":{"content":[{"type":"text","text":"hi"}]}}"#;

    const TEXT_LOG: &str = "OpenAI Codex v0.46.0\n--------\nmodel: gpt-5\n--------\nuser\nhello\n";

    #[test]
    fn test_json_is_tried_first() {
        let outcome = parse_with(JSON_LOG, &ParseOptions::default());
        assert_eq!(outcome.format, Some(LogFormat::JsonStream));
        assert_eq!(outcome.sessions.len(), 1);
    }

    #[test]
    fn test_falls_back_to_marker_text() {
        let outcome = parse_with(TEXT_LOG, &ParseOptions::default());
        assert_eq!(outcome.format, Some(LogFormat::MarkerText));
        assert_eq!(outcome.sessions[0].events[1], LogEvent::User { text: "hello".to_string() });
    }

    #[test]
    fn test_unrecognized_input_is_empty() {
        assert!(parse("just some words\nand more").is_empty());
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
        assert_eq!(detect_format("plain"), None);
    }

    #[test]
    fn test_forced_format_skips_other_parser() {
        let options = ParseOptions { format: Some(LogFormat::JsonStream), ..Default::default() };
        let outcome = parse_with(TEXT_LOG, &options);

        assert_eq!(outcome, ParseOutcome::default());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(JSON_LOG), Some(LogFormat::JsonStream));
        assert_eq!(detect_format(TEXT_LOG), Some(LogFormat::MarkerText));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(JSON_LOG), parse(JSON_LOG));
        assert_eq!(parse(TEXT_LOG), parse(TEXT_LOG));
    }
}
