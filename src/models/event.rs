use serde::{Deserialize, Serialize};

use super::session::SessionMeta;
use super::tool::ToolPayload;

/// Auxiliary commentary channel for [`LogEvent::Note`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteChannel {
    Thinking,
    System,
}

/// Name of a usage statistic carried by [`LogEvent::Stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatName {
    #[serde(rename = "tokens used")]
    TokensUsed,
}

/// One typed occurrence in a session timeline
///
/// The set is closed. Consumers should match exhaustively and render
/// [`LogEvent::Unknown`] as raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LogEvent {
    /// Synthetic marker emitted once when a session is opened
    SessionStart { meta: SessionMeta },
    User { text: String },
    Assistant { text: String },
    Note { channel: NoteChannel, text: String },
    ToolCall {
        name: String,
        args_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ToolPayload>,
    },
    ToolResult {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    ExecCall {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workdir: Option<String>,
    },
    ExecResult {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Patch { header: String, diff: String },
    PlanUpdate { text: String },
    Stats { name: StatName, value: String },
    /// Output after this point was elided by the source tool
    Truncated { reason: String },
    /// A non-blank line no recognizer claimed, kept verbatim
    Unknown { raw: String },
}

impl LogEvent {
    /// Stable snake_case tag, identical to the serialized `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            LogEvent::SessionStart { .. } => "session_start",
            LogEvent::User { .. } => "user",
            LogEvent::Assistant { .. } => "assistant",
            LogEvent::Note { .. } => "note",
            LogEvent::ToolCall { .. } => "tool_call",
            LogEvent::ToolResult { .. } => "tool_result",
            LogEvent::ExecCall { .. } => "exec_call",
            LogEvent::ExecResult { .. } => "exec_result",
            LogEvent::Patch { .. } => "patch",
            LogEvent::PlanUpdate { .. } => "plan_update",
            LogEvent::Stats { .. } => "stats",
            LogEvent::Truncated { .. } => "truncated",
            LogEvent::Unknown { .. } => "unknown",
        }
    }

    /// Whether this is a tool or exec outcome that reported failure
    pub fn is_failed_result(&self) -> bool {
        matches!(
            self,
            LogEvent::ToolResult { ok: false, .. } | LogEvent::ExecResult { ok: false, .. }
        )
    }
}
