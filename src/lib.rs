//! Agent Log Timeline - Turn captured AI coding-assistant output into a typed timeline
//!
//! This library reads the raw text a coding-assistant CLI printed during a run and
//! reconstructs the conversation as an ordered list of typed events. It supports:
//!
//! - JSON-Lines stream output (one `system`/`user`/`assistant`/`result` message per line)
//! - Marker-delimited text output (session banner, `user`/`codex`/`exec` headers, patches)
//! - Structured interpretation of well-known tool arguments (file reads, edits, searches)
//! - Batch loading of log files and directories
//!
//! # Example
//!
//! ```
//! use agent_log_timeline::{LogFormat, ParseOptions, parse_with};
//!
//! let text = "OpenAI Codex v0.46.0\n--------\nmodel: gpt-5\n--------\nuser\nhello\n";
//! let outcome = parse_with(text, &ParseOptions::default());
//!
//! assert_eq!(outcome.format, Some(LogFormat::MarkerText));
//! assert_eq!(outcome.sessions[0].meta.model.as_deref(), Some("gpt-5"));
//! ```

pub mod cli;
pub mod loader;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use loader::{LoadReport, discover_log_files, load_logs};
pub use models::{ConversationSession, LogEvent, SessionMeta, SessionSummary, ToolPayload};
pub use parsers::{LogFormat, ParseOptions, ParseOutcome, detect_format, interpret_tool_args, parse, parse_with};
pub use utils::join_chunks;
