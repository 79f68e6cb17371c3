use serde::{Deserialize, Serialize};

use super::event::LogEvent;

/// Descriptive attributes of one agent CLI run
///
/// Every field is optional and filled in as the parser meets the markers or
/// envelope fields carrying it. Values are only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
    /// Identity the session is grouped under (a resumed run uses the id it resumes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_summary: Option<String>,
    /// Version string of the CLI tool that produced the log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl SessionMeta {
    /// Add a cost reported by one run to the running total
    pub fn add_cost(&mut self, cost: f64) {
        self.cost_usd = Some(self.cost_usd.unwrap_or(0.0) + cost);
    }

    /// Add a duration reported by one run to the running total
    pub fn add_duration(&mut self, duration_ms: u64) {
        self.duration_ms = Some(self.duration_ms.unwrap_or(0).saturating_add(duration_ms));
    }
}

/// One continuous run of an agent CLI and its ordered timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub meta: SessionMeta,
    pub events: Vec<LogEvent>,
}

impl ConversationSession {
    /// Open a session, recording the synthetic `session_start` event
    pub fn open(meta: SessionMeta) -> Self {
        let events = vec![LogEvent::SessionStart { meta: meta.clone() }];
        Self { meta, events }
    }

    pub fn push(&mut self, event: LogEvent) {
        self.events.push(event);
    }

    /// Most recently appended event, if any
    pub fn last_event(&self) -> Option<&LogEvent> {
        self.events.last()
    }
}
