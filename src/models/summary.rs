use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::event::LogEvent;
use super::session::{ConversationSession, SessionMeta};

/// Per-session tallies used by the `stats` command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub meta: SessionMeta,
    pub total_events: usize,
    /// Event count keyed by [`LogEvent::kind`]
    pub event_counts: BTreeMap<String, usize>,
    /// Call count keyed by tool name
    pub tool_calls: BTreeMap<String, usize>,
    pub exec_calls: usize,
    pub failed_results: usize,
    /// Last reported tokens-used value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<String>,
}

impl SessionSummary {
    pub fn from_session(session: &ConversationSession) -> Self {
        let mut summary =
            Self { meta: session.meta.clone(), total_events: session.events.len(), ..Default::default() };

        for event in &session.events {
            *summary.event_counts.entry(event.kind().to_string()).or_insert(0) += 1;

            if event.is_failed_result() {
                summary.failed_results += 1;
            }

            match event {
                LogEvent::ToolCall { name, .. } => {
                    *summary.tool_calls.entry(name.clone()).or_insert(0) += 1;
                }
                LogEvent::ExecCall { .. } => summary.exec_calls += 1,
                LogEvent::Stats { value, .. } => summary.tokens_used = Some(value.clone()),
                _ => {}
            }
        }

        summary
    }

    pub fn count(&self, kind: &str) -> usize {
        self.event_counts.get(kind).copied().unwrap_or(0)
    }
}
