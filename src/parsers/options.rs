use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default character limit for tool results embedded in JSON user messages
pub const DEFAULT_TOOL_RESULT_CHAR_LIMIT: usize = 500;

/// Log encodings the dispatcher knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogFormat {
    /// One JSON message per line (stream-json output)
    #[serde(rename = "json")]
    JsonStream,
    /// Free-form text with marker lines and a session banner
    #[serde(rename = "text")]
    MarkerText,
}

impl LogFormat {
    pub fn name(self) -> &'static str {
        match self {
            LogFormat::JsonStream => "json",
            LogFormat::MarkerText => "text",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(LogFormat::JsonStream),
            "text" | "txt" => Ok(LogFormat::MarkerText),
            _ => Err(anyhow!("Unknown log format: '{}' (valid formats: json, text)", s)),
        }
    }
}

/// Knobs for a parse run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tool results whose compact JSON is this long or longer are not emitted
    pub tool_result_char_limit: usize,
    /// Only try this parser instead of auto-detecting
    pub format: Option<LogFormat>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { tool_result_char_limit: DEFAULT_TOOL_RESULT_CHAR_LIMIT, format: None }
    }
}
