//! Line recognizers for the marker-text log format.
//!
//! Each recognizer is a prefix or regex test over one normalized, trimmed line.
//! [`recognize`] applies them in a fixed order; a few markers only make sense in a
//! narrow context (dash rules and `key: value` lines inside the session banner) and are
//! exposed as separate helpers instead.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::models::SessionMeta;

static STREAM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[(?:stdout|stderr)\] ?").expect("stream prefix regex"));

static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{4}-\d{2}-\d{2}[T ][^\]]+)\]\s*").expect("timestamp prefix regex")
});

static SESSION_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^OpenAI Codex(?:\s+v?(\d[\w.+-]*))?(?:\s|$)").expect("banner regex")
});

static DASH_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}$").expect("dash rule regex"));

static META_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 _-]*?)\s*:\s*(.*)$").expect("meta line regex")
});

static SUCCEEDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*\s)?succeeded in (\d+(?:\.\d+)?)(ms|s):$").expect("succeeded regex")
});

static EXITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*\s)?exited (-?\d+) in (\d+(?:\.\d+)?)(ms|s):$").expect("exited regex")
});

static TOOL_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tool ([A-Za-z_][\w.:/-]*)\((.*)\)$").expect("tool call regex")
});

static FILE_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:file update|turn diff):?|apply_patch(?:\s.*)?)$").expect("file update regex")
});

static PLAN_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:plan update|update plan|update_plan)(?::.*)?$").expect("plan update regex")
});

static TOKENS_USED: LazyLock<Regex> =
    LazyLock::new(|| {
    Regex::new(r"(?i)^tokens used(?::|(?::\s*|\s+)(\d[\d,._ ]*))?$").expect("tokens regex")
});

static TOKEN_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d,._ ]*$").expect("token value regex"));

static TOTAL_OUTPUT_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^total output lines:\s*(\d+)$").expect("total output lines regex")
});

static TRUNCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\.\.\.\s*(.+?)\s*\.\.\.\]$|(?i)^\[?(output truncated[^\]]*)\]?$")
        .expect("truncation regex")
});

/// A recognized marker line and the values captured from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    SessionBanner { version: Option<&'a str> },
    User,
    Assistant,
    Thinking,
    ExecCall,
    Succeeded { duration_ms: Option<u64> },
    Exited { code: i32, duration_ms: Option<u64> },
    ToolCall { name: &'a str, args: &'a str },
    FileUpdate,
    DiffStart,
    PlanUpdate,
    TokensUsed { value: Option<&'a str> },
    TotalOutputLines,
    Truncated { reason: &'a str },
}

/// One input line split into the views the parser needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Original line without its line terminator
    pub raw: &'a str,
    /// Line with stream and timestamp prefixes removed, indentation kept
    pub content: &'a str,
    /// `content` trimmed on both sides, used for matching
    pub trimmed: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(raw: &'a str) -> Self {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let content = strip_timestamp_prefix(strip_stream_prefix(raw));
        Self { raw, content, trimmed: content.trim() }
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Unified-diff change line (addition, removal, hunk header, no-newline note)
    pub fn is_diff_change(&self) -> bool {
        matches!(self.content.as_bytes().first(), Some(b'+' | b'-' | b'@' | b'\\'))
    }

    /// Unified-diff context line
    pub fn is_diff_context(&self) -> bool {
        self.content.starts_with(' ')
    }
}

/// Remove a leading `[stdout]`/`[stderr]` origin tag
pub fn strip_stream_prefix(line: &str) -> &str {
    match STREAM_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Remove a leading bracketed timestamp, but only when it really is a date-time
fn strip_timestamp_prefix(line: &str) -> &str {
    let Some(caps) = TIMESTAMP_PREFIX.captures(line) else {
        return line;
    };
    let (Some(whole), Some(stamp)) = (caps.get(0), caps.get(1)) else {
        return line;
    };
    if is_timestamp(stamp.as_str()) { &line[whole.end()..] } else { line }
}

fn is_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}

/// Classify a trimmed line; `None` for ordinary content
pub fn recognize(trimmed: &str) -> Option<Marker<'_>> {
    if let Some(caps) = SESSION_BANNER.captures(trimmed) {
        return Some(Marker::SessionBanner { version: caps.get(1).map(|m| m.as_str()) });
    }

    match trimmed {
        "user" | "User instructions:" => return Some(Marker::User),
        "codex" | "assistant" => return Some(Marker::Assistant),
        "thinking" => return Some(Marker::Thinking),
        "exec" => return Some(Marker::ExecCall),
        _ => {}
    }

    if FILE_UPDATE.is_match(trimmed) {
        return Some(Marker::FileUpdate);
    }
    if trimmed.starts_with("diff --git ") {
        return Some(Marker::DiffStart);
    }
    if PLAN_UPDATE.is_match(trimmed) {
        return Some(Marker::PlanUpdate);
    }
    if let Some(caps) = TOKENS_USED.captures(trimmed) {
        let value = caps.get(1).map(|m| m.as_str().trim()).filter(|v| !v.is_empty());
        return Some(Marker::TokensUsed { value });
    }
    if TOTAL_OUTPUT_LINES.is_match(trimmed) {
        return Some(Marker::TotalOutputLines);
    }
    if let Some(caps) = TRUNCATION.captures(trimmed) {
        let reason = caps.get(1).or_else(|| caps.get(2)).map_or(trimmed, |m| m.as_str());
        return Some(Marker::Truncated { reason });
    }
    if let Some(caps) = EXITED.captures(trimmed)
        && let Ok(code) = caps[1].parse::<i32>()
    {
        return Some(Marker::Exited { code, duration_ms: parse_duration(&caps[2], &caps[3]) });
    }
    if let Some(caps) = SUCCEEDED.captures(trimmed) {
        return Some(Marker::Succeeded { duration_ms: parse_duration(&caps[1], &caps[2]) });
    }
    if let Some(caps) = TOOL_CALL.captures(trimmed)
        && let (Some(name), Some(args)) = (caps.get(1), caps.get(2))
    {
        return Some(Marker::ToolCall { name: name.as_str(), args: args.as_str() });
    }

    None
}

pub fn is_marker(trimmed: &str) -> bool {
    recognize(trimmed).is_some()
}

pub fn is_dash_rule(trimmed: &str) -> bool {
    DASH_RULE.is_match(trimmed)
}

/// Value line following a bare `tokens used` header
pub fn is_token_value(trimmed: &str) -> bool {
    TOKEN_VALUE.is_match(trimmed)
}

/// Split a banner `key: value` line
pub fn parse_meta_line(trimmed: &str) -> Option<(&str, &str)> {
    let caps = META_LINE.captures(trimmed)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()))
}

/// Store a banner value under the meta field its key names
///
/// Keys are matched case-insensitively with spaces, underscores and hyphens treated
/// alike. Returns `false` for keys outside the meta field set.
pub fn apply_meta(meta: &mut SessionMeta, key: &str, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let value = Some(value.to_string());

    match normalize_key(key).as_str() {
        "workdir" | "cwd" | "working directory" => meta.workdir = value,
        "model" => meta.model = value,
        "provider" | "model provider" => meta.provider = value,
        "approval" | "approval policy" | "approval mode" => meta.approval = value,
        "sandbox" | "sandbox mode" | "sandbox policy" => meta.sandbox = value,
        "session id" | "session" => meta.context_id = value,
        "parent session id" | "resumed session id" | "resumed from" | "resume" => {
            meta.parent_session_id = value
        }
        "reasoning effort" => meta.reasoning_effort = value,
        "reasoning summaries" | "reasoning summary" => meta.reasoning_summary = value,
        "version" => meta.version = value,
        _ => return false,
    }
    true
}

fn normalize_key(key: &str) -> String {
    key.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a captured `<number><unit>` duration to whole milliseconds
fn parse_duration(number: &str, unit: &str) -> Option<u64> {
    let value: f64 = number.parse().ok()?;
    let ms = if unit == "s" { value * 1000.0 } else { value };
    Some(ms.round() as u64)
}

/// Split an exec command line on the last `" in "` into command and workdir
pub fn split_exec_command(line: &str) -> (String, Option<String>) {
    match line.rfind(" in ") {
        Some(idx) => {
            let command = line[..idx].trim().to_string();
            let workdir = line[idx + 4..].trim();
            (command, (!workdir.is_empty()).then(|| workdir.to_string()))
        }
        None => (line.trim().to_string(), None),
    }
}
