//! Parser for JSON-Lines stream output (one JSON message per line).
//!
//! The first non-blank line must be a JSON object with a string `type` field, otherwise
//! the input is rejected without looking further. After that, every line is decoded on
//! its own: lines that aren't JSON, or aren't a message we know, are skipped silently
//! since partial and interleaved lines are normal in captured output.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{ConversationSession, LogEvent, NoteChannel, SessionMeta};
use crate::parsers::deserializers::{deserialize_segments, lenient};
use crate::parsers::markers::strip_stream_prefix;
use crate::parsers::options::ParseOptions;
use crate::parsers::tool_args::interpret_tool_args;

const SUBTYPE_INIT: &str = "init";
const SUBTYPE_SUCCESS: &str = "success";

/// One decoded line of the stream
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamMessage {
    System(SystemMessage),
    User(ChatMessage),
    Assistant(ChatMessage),
    Result(ResultMessage),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct SystemMessage {
    #[serde(default, deserialize_with = "lenient")]
    subtype: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    model: Option<String>,
    #[serde(default, alias = "permissionMode", deserialize_with = "lenient")]
    permission_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    claude_code_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    resume_session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    resumed_session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    parent_session_id: Option<String>,
}

impl SystemMessage {
    /// Id of the conversation this run resumes, under whichever key the CLI used
    fn resumed_from(&self) -> Option<String> {
        self.resume_session_id
            .clone()
            .or_else(|| self.resumed_session_id.clone())
            .or_else(|| self.parent_session_id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default, deserialize_with = "lenient")]
    message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default, deserialize_with = "deserialize_segments")]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        #[serde(default, deserialize_with = "lenient")]
        text: Option<String>,
    },
    Thinking {
        #[serde(default, deserialize_with = "lenient")]
        thinking: Option<String>,
    },
    ToolUse {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        content: Value,
        #[serde(default, deserialize_with = "lenient")]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Other,
}

impl From<String> for ContentBlock {
    fn from(text: String) -> Self {
        ContentBlock::Text { text: Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct ResultMessage {
    #[serde(default, deserialize_with = "lenient")]
    subtype: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    is_error: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    result: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    total_cost_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    cost_usd: Option<f64>,
}

struct JsonStreamParser<'o> {
    options: &'o ParseOptions,
    sessions: Vec<ConversationSession>,
}

/// Parse JSON-Lines stream output into sessions
///
/// Returns `None` when the first non-blank line is not a typed JSON envelope, or when
/// no session could be built.
pub fn try_parse(text: &str, options: &ParseOptions) -> Option<Vec<ConversationSession>> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| strip_stream_prefix(line).trim())
        .filter(|line| !line.is_empty())
        .collect();

    let first = lines.first()?;
    if !has_envelope(first) {
        log::debug!("json parser rejected input: first line is not a typed JSON envelope");
        return None;
    }

    let mut parser = JsonStreamParser { options, sessions: Vec::new() };
    for (line_num, line) in lines.iter().enumerate() {
        match serde_json::from_str::<StreamMessage>(line) {
            Ok(message) => parser.handle(message),
            Err(e) => log::debug!("skipping line {}: {}", line_num + 1, e),
        }
    }

    if parser.sessions.is_empty() { None } else { Some(parser.sessions) }
}

fn has_envelope(line: &str) -> bool {
    serde_json::from_str::<Value>(line)
        .ok()
        .is_some_and(|value| value.get("type").is_some_and(Value::is_string))
}

impl JsonStreamParser<'_> {
    fn handle(&mut self, message: StreamMessage) {
        match message {
            StreamMessage::System(system) => self.handle_system(system),
            StreamMessage::User(chat) => self.handle_user(chat),
            StreamMessage::Assistant(chat) => self.handle_assistant(chat),
            StreamMessage::Result(result) => self.handle_result(result),
            StreamMessage::Other => {}
        }
    }

    /// Session that events go to, synthesized when the stream has no init line
    fn current(&mut self) -> &mut ConversationSession {
        if self.sessions.is_empty() {
            log::debug!("no init message before first event, opening a default session");
            self.sessions.push(ConversationSession::open(SessionMeta::default()));
        }
        let last = self.sessions.len() - 1;
        &mut self.sessions[last]
    }

    fn handle_system(&mut self, system: SystemMessage) {
        if system.subtype.as_deref() != Some(SUBTYPE_INIT) {
            return;
        }

        let resumed_from = system.resumed_from();
        let meta = SessionMeta {
            workdir: system.cwd,
            model: system.model,
            approval: system.permission_mode,
            version: system.claude_code_version.or(system.version),
            // A resumed run is grouped under the conversation it resumes
            context_id: resumed_from.clone().or(system.session_id),
            parent_session_id: resumed_from,
            ..Default::default()
        };
        self.sessions.push(ConversationSession::open(meta));
    }

    fn handle_user(&mut self, chat: ChatMessage) {
        let blocks = chat.message.map(|m| m.content).unwrap_or_default();
        let limit = self.options.tool_result_char_limit;
        let session = self.current();

        let text = join_text(&blocks);
        if !text.trim().is_empty() {
            session.push(LogEvent::User { text });
        }

        for block in &blocks {
            if let ContentBlock::ToolResult { content, is_error } = block {
                // Large payloads duplicate output already shown elsewhere
                if content.to_string().chars().count() >= limit {
                    continue;
                }
                session.push(LogEvent::ToolResult {
                    ok: !is_error.unwrap_or(false),
                    code: None,
                    duration_ms: None,
                    text: result_text(content),
                });
            }
        }
    }

    fn handle_assistant(&mut self, chat: ChatMessage) {
        let blocks = chat.message.map(|m| m.content).unwrap_or_default();
        let session = self.current();

        for block in &blocks {
            if let ContentBlock::Thinking { thinking: Some(thinking) } = block
                && !thinking.trim().is_empty()
            {
                session.push(LogEvent::Note { channel: NoteChannel::Thinking, text: thinking.clone() });
            }
        }

        let text = join_text(&blocks);
        if !text.trim().is_empty() {
            session.push(LogEvent::Assistant { text });
        }

        for block in blocks {
            if let ContentBlock::ToolUse { name, input } = block {
                let name = name.unwrap_or_else(|| "unknown".to_string());
                let data = interpret_tool_args(&name, &input);
                session.push(LogEvent::ToolCall { args_text: args_text(&input), name, data });
            }
        }
    }

    fn handle_result(&mut self, result: ResultMessage) {
        let ok = !result.is_error.unwrap_or(false)
            && result.subtype.as_deref().is_none_or(|subtype| subtype == SUBTYPE_SUCCESS);
        let session = self.current();

        let mut text = result.result.filter(|t| !t.trim().is_empty());
        if let Some(LogEvent::Assistant { text: previous }) = session.last_event()
            && text.as_ref() == Some(previous)
        {
            text = None;
        }

        session.push(LogEvent::ExecResult { ok, code: None, duration_ms: result.duration_ms, text });

        if let Some(cost) = result.total_cost_usd.or(result.cost_usd) {
            session.meta.add_cost(cost);
        }
        if let Some(duration_ms) = result.duration_ms {
            session.meta.add_duration(duration_ms);
        }
    }
}

/// Concatenate the text segments of a message
fn join_text(blocks: &[ContentBlock]) -> String {
    let parts: Vec<&str> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text: Some(text) } if !text.is_empty() => Some(text.as_str()),
            _ => None,
        })
        .collect();
    parts.join("\n")
}

/// Raw string arguments are kept as-is, structured ones pretty-printed
fn args_text(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Display text of a tool-result payload
fn result_text(content: &Value) -> Option<String> {
    let text = match content {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let texts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() { content.to_string() } else { texts.join("\n") }
        }
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}
